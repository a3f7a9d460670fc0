//! Modulation selector and encoder dispatch.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::encoder::{self, EncoderFn};

/// The closed set of supported line codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModulationType {
    /// Non-return-to-zero mark
    NrzM,
    /// Manchester, Bi-phase L
    Manchester,
    /// Unipolar return-to-zero
    UnipolarRz,
    /// Bipolar alternate mark inversion
    BipolarAmi,
}

impl ModulationType {
    /// Every variant, in display order.
    pub const ALL: [Self; 4] = [
        Self::NrzM,
        Self::Manchester,
        Self::UnipolarRz,
        Self::BipolarAmi,
    ];

    /// Canonical display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NrzM => "NRZ-M",
            Self::Manchester => "Manchester (Bi-phase L)",
            Self::UnipolarRz => "Unipolar RZ",
            Self::BipolarAmi => "Bipolar AMI",
        }
    }

    /// Short command-line friendly identifier.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::NrzM => "nrzm",
            Self::Manchester => "manchester",
            Self::UnipolarRz => "unipolar-rz",
            Self::BipolarAmi => "bipolar-ami",
        }
    }
}

impl fmt::Display for ModulationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Selector string matched none of the supported modulations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported modulation type '{0}'")]
pub struct ParseModulationError(pub String);

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for ModulationType {
    type Err = ParseModulationError;

    /// Accepts canonical names and slugs, ignoring case and punctuation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        let found = match key.as_str() {
            "nrzm" => Some(Self::NrzM),
            "manchester" | "manchesterbiphasel" | "biphasel" => Some(Self::Manchester),
            "unipolarrz" | "rz" => Some(Self::UnipolarRz),
            "bipolarami" | "ami" => Some(Self::BipolarAmi),
            _ => None,
        };
        found.ok_or_else(|| ParseModulationError(s.to_owned()))
    }
}

impl TryFrom<String> for ModulationType {
    type Error = ParseModulationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModulationType> for String {
    fn from(value: ModulationType) -> Self {
        value.name().to_owned()
    }
}

/// Maps each modulation to its encoder.
///
/// [`ModulationRegistry::standard`] covers the whole closed set; a lookup
/// miss is only possible on a registry assembled by hand.
#[derive(Debug, Clone)]
pub struct ModulationRegistry {
    encoders: BTreeMap<ModulationType, EncoderFn>,
}

impl Default for ModulationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl ModulationRegistry {
    /// Registry with all four encoders.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(ModulationType::NrzM, encoder::nrz_m);
        registry.register(ModulationType::Manchester, encoder::manchester);
        registry.register(ModulationType::UnipolarRz, encoder::unipolar_rz);
        registry.register(ModulationType::BipolarAmi, encoder::bipolar_ami);
        registry
    }

    /// Registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            encoders: BTreeMap::new(),
        }
    }

    /// Install or replace the encoder for `modulation`.
    pub fn register(&mut self, modulation: ModulationType, encoder: EncoderFn) {
        self.encoders.insert(modulation, encoder);
    }

    /// Encoder for `modulation`, if registered.
    pub fn get(&self, modulation: ModulationType) -> Option<EncoderFn> {
        self.encoders.get(&modulation).copied()
    }

    /// Registered modulations, in display order.
    pub fn supported(&self) -> impl Iterator<Item = ModulationType> + '_ {
        self.encoders.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for modulation in ModulationType::ALL {
            assert_eq!(modulation.name().parse(), Ok(modulation));
            assert_eq!(modulation.slug().parse(), Ok(modulation));
        }
    }

    #[test]
    fn test_parse_ignores_case_and_punctuation() {
        assert_eq!("nrz_m".parse(), Ok(ModulationType::NrzM));
        assert_eq!("BIPOLAR AMI".parse(), Ok(ModulationType::BipolarAmi));
        assert_eq!("Unipolar-RZ".parse(), Ok(ModulationType::UnipolarRz));
    }

    #[test]
    fn test_unknown_modulation_is_rejected() {
        assert_eq!(
            "QAM-16".parse::<ModulationType>(),
            Err(ParseModulationError("QAM-16".to_owned()))
        );
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&ModulationType::Manchester).unwrap();
        assert_eq!(json, r#""Manchester (Bi-phase L)""#);
        let parsed: ModulationType = serde_json::from_str(r#""manchester""#).unwrap();
        assert_eq!(parsed, ModulationType::Manchester);
        assert!(serde_json::from_str::<ModulationType>(r#""PSK""#).is_err());
    }

    #[test]
    fn test_standard_registry_covers_every_modulation() {
        let registry = ModulationRegistry::standard();
        for modulation in ModulationType::ALL {
            assert!(registry.get(modulation).is_some(), "{modulation}");
        }
        assert_eq!(
            registry.supported().collect::<Vec<_>>(),
            ModulationType::ALL.to_vec()
        );
    }

    #[test]
    fn test_empty_registry_reports_missing_encoder() {
        let mut registry = ModulationRegistry::empty();
        assert!(registry.get(ModulationType::NrzM).is_none());
        registry.register(ModulationType::NrzM, encoder::nrz_m);
        assert!(registry.get(ModulationType::NrzM).is_some());
        assert!(registry.get(ModulationType::BipolarAmi).is_none());
    }
}
