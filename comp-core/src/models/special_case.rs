use serde::{Deserialize, Serialize};

/// Special employment categories that carry their own statutory wage rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpecialCase {
    #[default]
    None,
    Guard,
    VolunteerFirefighter,
    VolunteerRescue,
    VolunteerSheriff,
    VolunteerConstable,
    Inmate,
    Student,
}

impl SpecialCase {
    pub fn all() -> &'static [SpecialCase] {
        &[
            Self::None,
            Self::Guard,
            Self::VolunteerFirefighter,
            Self::VolunteerRescue,
            Self::VolunteerSheriff,
            Self::VolunteerConstable,
            Self::Inmate,
            Self::Student,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Guard => "guard",
            Self::VolunteerFirefighter => "volunteer_ff",
            Self::VolunteerRescue => "volunteer_rescue",
            Self::VolunteerSheriff => "volunteer_sheriff",
            Self::VolunteerConstable => "volunteer_constable",
            Self::Inmate => "inmate",
            Self::Student => "student",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "none" => Some(Self::None),
            "guard" => Some(Self::Guard),
            "volunteer_ff" => Some(Self::VolunteerFirefighter),
            "volunteer_rescue" => Some(Self::VolunteerRescue),
            "volunteer_sheriff" => Some(Self::VolunteerSheriff),
            "volunteer_constable" => Some(Self::VolunteerConstable),
            "inmate" => Some(Self::Inmate),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None of these",
            Self::Guard => "National Guard / State Guard member",
            Self::VolunteerFirefighter => "Volunteer firefighter",
            Self::VolunteerRescue => "Volunteer rescue squad member",
            Self::VolunteerSheriff => "Volunteer deputy sheriff",
            Self::VolunteerConstable => "Volunteer state constable",
            Self::Inmate => "Inmate",
            Self::Student => "Student",
        }
    }
}
