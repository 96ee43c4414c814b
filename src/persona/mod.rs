// src/persona/mod.rs
// Persona variants the shadow can speak in.
// A conversation's mirror-mode flag picks one; adding a persona means adding a variant.

pub mod default;

use serde::{Deserialize, Serialize};

use default::{
    CHALLENGER_GUIDANCE, CHALLENGER_INTRO, MIRRORING_GUIDANCE, MIRRORING_INTRO, TRAINING_HEADING,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Replica of the user's voice (mirror mode off)
    Mirroring,
    /// Devil's advocate in the user's voice (mirror mode on)
    Challenger,
}

impl Persona {
    /// The only bridge from the stored boolean flag to a persona
    pub fn from_mirror_mode(mirror_mode: bool) -> Self {
        if mirror_mode {
            Persona::Challenger
        } else {
            Persona::Mirroring
        }
    }

    pub fn mirror_mode(&self) -> bool {
        matches!(self, Persona::Challenger)
    }

    fn intro(&self) -> &'static str {
        match self {
            Persona::Mirroring => MIRRORING_INTRO,
            Persona::Challenger => CHALLENGER_INTRO,
        }
    }

    fn guidance(&self) -> &'static str {
        match self {
            Persona::Mirroring => MIRRORING_GUIDANCE,
            Persona::Challenger => CHALLENGER_GUIDANCE,
        }
    }

    /// Render the full system prompt around an already-built training context
    pub fn system_prompt(&self, training_context: &str) -> String {
        format!(
            "{}\n\n{}\n{}\n\n{}",
            self.intro(),
            TRAINING_HEADING,
            training_context,
            self.guidance()
        )
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Persona::Mirroring => "mirroring",
                Persona::Challenger => "challenger",
            }
        )
    }
}

impl std::str::FromStr for Persona {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mirroring" => Ok(Persona::Mirroring),
            "challenger" => Ok(Persona::Challenger),
            _ => Err(()),
        }
    }
}
