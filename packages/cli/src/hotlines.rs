//! Emergency hotline directory.

use serde::Serialize;

/// One emergency contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HotlineContact {
    /// Agency name.
    pub name: &'static str,
    /// What the agency handles.
    pub description: &'static str,
    /// Number(s) to dial, as printed by the agency.
    pub number: &'static str,
    /// Agency contact page.
    pub url: &'static str,
}

/// Philippine national emergency hotlines.
pub const HOTLINES: &[HotlineContact] = &[
    HotlineContact {
        name: "National Emergency Hotline",
        description: "For all emergencies",
        number: "911",
        url: "https://bettergov.ph/philippines/hotlines",
    },
    HotlineContact {
        name: "Bureau of Fire Protection",
        description: "Fire emergencies",
        number: "160 / (02) 8426-0219",
        url: "https://www.foi.gov.ph/agencies/bfp/",
    },
    HotlineContact {
        name: "Philippine National Police",
        description: "Crime and security emergencies",
        number: "117/ (02) 8722-0650",
        url: "https://www.foi.gov.ph/agencies/pnp/",
    },
    HotlineContact {
        name: "Philippine Red Cross",
        description: "Medical emergencies & disasters",
        number: "143 / (02) 8527-0000",
        url: "https://redcross.org.ph/contact-us/",
    },
    HotlineContact {
        name: "NDRRMC",
        description: "Disaster risk reduction & management",
        number: "(02) 8911-5061",
        url: "https://monitoring-dashboard.ndrrmc.gov.ph/",
    },
    HotlineContact {
        name: "DOH Health Emergency",
        description: "Health-related emergencies",
        number: "1555",
        url: "https://doh.gov.ph/",
    },
];

impl HotlineContact {
    /// Two-line listing: name and number, then description and URL.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{:<30} {}\n  {} ({})",
            self.name, self.number, self.description, self.url
        )
    }
}
