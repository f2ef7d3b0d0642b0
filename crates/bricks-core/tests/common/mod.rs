#![allow(dead_code)]

pub mod policy_server;
