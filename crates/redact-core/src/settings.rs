//! Per-category redaction switches

use serde::{Deserialize, Serialize};

/// PII category the redaction service may mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiiCategory {
    Emails,
    Phones,
    Names,
    Addresses,
}

impl PiiCategory {
    pub const ALL: [PiiCategory; 4] = [
        PiiCategory::Emails,
        PiiCategory::Phones,
        PiiCategory::Names,
        PiiCategory::Addresses,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PiiCategory::Emails => "Emails",
            PiiCategory::Phones => "Phone numbers",
            PiiCategory::Names => "Names",
            PiiCategory::Addresses => "Addresses",
        }
    }
}

/// One flag per category. Always serialised as the full set of four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionSettings {
    pub emails: bool,
    pub phones: bool,
    pub names: bool,
    pub addresses: bool,
}

impl Default for RedactionSettings {
    fn default() -> Self {
        Self {
            emails: true,
            phones: true,
            names: true,
            addresses: true,
        }
    }
}

impl RedactionSettings {
    pub fn none() -> Self {
        Self {
            emails: false,
            phones: false,
            names: false,
            addresses: false,
        }
    }

    pub fn is_enabled(&self, category: PiiCategory) -> bool {
        match category {
            PiiCategory::Emails => self.emails,
            PiiCategory::Phones => self.phones,
            PiiCategory::Names => self.names,
            PiiCategory::Addresses => self.addresses,
        }
    }

    pub fn set(&mut self, category: PiiCategory, enabled: bool) {
        let flag = match category {
            PiiCategory::Emails => &mut self.emails,
            PiiCategory::Phones => &mut self.phones,
            PiiCategory::Names => &mut self.names,
            PiiCategory::Addresses => &mut self.addresses,
        };
        *flag = enabled;
    }

    pub fn toggle(&mut self, category: PiiCategory) {
        self.set(category, !self.is_enabled(category));
    }
}
