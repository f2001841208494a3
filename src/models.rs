use std::fmt;

// Username/password pair for the portal. The password never appears in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// Zero-based grading period index as the service expects it on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReportingPeriod(u8);

impl ReportingPeriod {
    pub fn new(index: u8) -> Self {
        Self(index)
    }

    // Iterates over the first `count` periods in order.
    pub fn first(count: u8) -> impl Iterator<Item = ReportingPeriod> {
        (0..count).map(ReportingPeriod::new)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "period {}", u16::from(self.0) + 1)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gradebook {
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Course {
    pub title: Option<String>,
    pub room: Option<String>,
    pub staff: Option<String>,
    pub period: Option<String>,
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mark {
    pub name: Option<String>,
    pub calculated_score: Option<String>,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    pub measure: Option<String>,
    pub kind: Option<String>,
    pub date: Option<String>,
    pub due_date: Option<String>,
    pub score: Option<String>,
    pub points: Option<String>,
    pub notes: Option<String>,
}
