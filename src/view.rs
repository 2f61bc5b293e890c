/// Mutually exclusive panels of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Panel,
    AppointmentForm,
    Results,
    ResultForm,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Panel,
        Section::AppointmentForm,
        Section::Results,
        Section::ResultForm,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Section::Panel => "panel",
            Section::AppointmentForm => "appointment-form",
            Section::Results => "results",
            Section::ResultForm => "result-form",
        }
    }

    /// Text of the navigation control that opens this section.
    pub fn label(self) -> &'static str {
        match self {
            Section::Panel => "Appointments",
            Section::AppointmentForm => "Book appointment",
            Section::Results => "Medical results",
            Section::ResultForm => "Register result",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.slug() == slug)
    }

    pub fn is_form(self) -> bool {
        matches!(self, Section::AppointmentForm | Section::ResultForm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        }
    }
}

/// One-shot message shown above the sections on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_slug(section.slug()), Some(section));
        }
        assert_eq!(Section::from_slug("settings"), None);
    }

    #[test]
    fn labels_are_distinct() {
        for a in Section::ALL {
            for b in Section::ALL {
                if a != b {
                    assert_ne!(a.label(), b.label());
                }
            }
        }
    }
}
