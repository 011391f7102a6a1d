use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// What one interaction renders back: status notices first, then content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub notices: Vec<Notice>,
    pub sections: Vec<Section>,
}

impl Reply {
    pub fn success(msg: impl Into<String>) -> Self {
        Self::default().notice(Notice::Success(msg.into()))
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::default().notice(Notice::Warning(msg.into()))
    }

    pub fn notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    pub fn section(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.push(Section {
            title: title.into(),
            body: body.into(),
        });
        self
    }

    /// Input problems become warnings, everything else an error.
    pub fn from_error(err: &AppError) -> Self {
        let notice = if err.is_user_error() {
            Notice::Warning(err.to_string())
        } else {
            Notice::Error(err.to_string())
        };
        Self::default().notice(notice)
    }

    pub fn has_error(&self) -> bool {
        self.notices.iter().any(|n| matches!(n, Notice::Error(_)))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for notice in &self.notices {
            let line = match notice {
                Notice::Success(m) => format!("✅ {}", m),
                Notice::Warning(m) => format!("⚠️ {}", m),
                Notice::Error(m) => format!("❌ {}", m),
            };
            out.push_str(&line);
            out.push('\n');
        }
        for section in &self.sections {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n{}\n", section.title, section.body));
        }
        out.trim_end().to_string()
    }
}
