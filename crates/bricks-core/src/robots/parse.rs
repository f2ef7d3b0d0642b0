//! robots.txt grammar: user-agent groups with ordered allow/disallow rules.

use crate::url_model::percent_decode;

/// One path rule. An empty `Disallow:` is stored as an allow-everything rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub path: String,
    pub allow: bool,
}

impl Rule {
    fn new(raw_path: &str, allow: bool) -> Self {
        let allow = allow || raw_path.is_empty();
        Rule {
            path: percent_decode(raw_path),
            allow,
        }
    }

    fn applies_to(&self, path: &str) -> bool {
        self.path == "*" || path.starts_with(&self.path)
    }
}

/// A block of rules shared by one or more user agents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub agents: Vec<String>,
    pub rules: Vec<Rule>,
}

impl Group {
    /// Matches on the product token (text before `/`), case-insensitively, as a substring.
    fn applies_to(&self, agent: &str) -> bool {
        let token = agent.split('/').next().unwrap_or("").to_ascii_lowercase();
        self.agents.iter().any(|a| {
            a == "*" || (!a.is_empty() && token.contains(a.to_ascii_lowercase().as_str()))
        })
    }

    /// First matching rule wins; no match means allowed.
    fn allowance(&self, path: &str) -> bool {
        self.rules
            .iter()
            .find(|r| r.applies_to(path))
            .map(|r| r.allow)
            .unwrap_or(true)
    }

    fn is_wildcard(&self) -> bool {
        self.agents.iter().any(|a| a == "*")
    }
}

/// Parsed policy: named groups in file order plus the first `*` group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    pub groups: Vec<Group>,
    pub wildcard: Option<Group>,
}

impl RuleSet {
    /// `path` is the percent-decoded path (and query) of the target URL.
    pub fn allows(&self, agent: &str, path: &str) -> bool {
        if let Some(group) = self.groups.iter().find(|g| g.applies_to(agent)) {
            return group.allowance(path);
        }
        self.wildcard
            .as_ref()
            .map(|g| g.allowance(path))
            .unwrap_or(true)
    }

    fn push(&mut self, group: Group) {
        if group.is_wildcard() {
            if self.wildcard.is_none() {
                self.wildcard = Some(group);
            }
        } else {
            self.groups.push(group);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Agents,
    Rules,
}

/// Parses a policy document. Unknown directives and malformed lines are skipped.
pub fn parse(text: &str) -> RuleSet {
    let mut set = RuleSet::default();
    let mut group = Group::default();
    let mut state = State::Start;

    for raw in text.lines() {
        let line = match raw.find('#') {
            Some(i) => &raw[..i],
            None => raw,
        }
        .trim();

        if line.is_empty() {
            // Only a truly empty line ends a record; whitespace and comment-only lines are skipped.
            if raw.is_empty() {
                match state {
                    State::Agents => {
                        group = Group::default();
                        state = State::Start;
                    }
                    State::Rules => {
                        set.push(std::mem::take(&mut group));
                        state = State::Start;
                    }
                    State::Start => {}
                }
            }
            continue;
        }

        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f.trim().to_ascii_lowercase(), v.trim()),
            None => continue,
        };

        match field.as_str() {
            "user-agent" => {
                if state == State::Rules {
                    set.push(std::mem::take(&mut group));
                }
                group.agents.push(value.to_string());
                state = State::Agents;
            }
            "disallow" | "allow" if state != State::Start => {
                group.rules.push(Rule::new(value, field == "allow"));
                state = State::Rules;
            }
            _ => {}
        }
    }

    if state == State::Rules {
        set.push(group);
    }
    set
}
