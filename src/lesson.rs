//! The built-in lesson catalog and prompt sources.

use crate::error::{Result, TtvError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A pre-authored lesson prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lesson {
    /// The sun and the eight planets in orbit.
    SolarSystem,
    /// Evaporation, condensation, precipitation and runoff.
    WaterCycle,
    /// Light, water and carbon dioxide turning into glucose and oxygen.
    Photosynthesis,
}

impl Lesson {
    /// Every lesson, in display order.
    pub const ALL: [Lesson; 3] = [Self::SolarSystem, Self::WaterCycle, Self::Photosynthesis];

    /// Returns the catalog key (e.g. `water_cycle`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::SolarSystem => "solar_system",
            Self::WaterCycle => "water_cycle",
            Self::Photosynthesis => "photosynthesis",
        }
    }

    /// Returns a short human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::SolarSystem => "Solar System",
            Self::WaterCycle => "Water Cycle",
            Self::Photosynthesis => "Photosynthesis",
        }
    }

    /// Returns the full prompt sent to the generation service.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::SolarSystem => {
                "An educational animation of the solar system: the sun at the center, planets \
                 Mercury, Venus, Earth, Mars, Jupiter, Saturn, Uranus, Neptune orbiting smoothly \
                 around it in their elliptical paths, with stable camera tracking following the \
                 motion, no looping artifacts, smooth transitions."
            }
            Self::WaterCycle => {
                "An educational animation of the water cycle: water evaporating from oceans into \
                 vapor, condensing into clouds, precipitating as rain or snow back to earth, \
                 flowing into rivers and back to oceans, with smooth continuous motion and stable \
                 subject tracking."
            }
            Self::Photosynthesis => {
                "An educational animation of photosynthesis in a plant: sunlight energy absorbed \
                 by chlorophyll in leaves, water from roots and carbon dioxide from air combined \
                 to produce glucose and oxygen, with smooth motion showing the process step by \
                 step, stable tracking."
            }
        }
    }
}

impl std::fmt::Display for Lesson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Lesson {
    type Err = TtvError;

    fn from_str(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|lesson| lesson.key() == key)
            .ok_or_else(|| TtvError::UnknownLesson(key.to_string()))
    }
}

/// Where a submission's prompt comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    /// A catalog lesson; its prompt wins over any free text.
    Lesson(Lesson),
    /// Text typed by the user, kept verbatim.
    FreeText(String),
}

impl PromptSource {
    /// Resolves the source to the prompt string that will be submitted.
    pub fn resolve(&self) -> &str {
        match self {
            Self::Lesson(lesson) => lesson.prompt(),
            Self::FreeText(text) => text,
        }
    }

    /// Resolves and validates, rejecting prompts that are blank after trimming.
    ///
    /// The returned prompt is not trimmed.
    pub fn validated(&self) -> Result<&str> {
        let prompt = self.resolve();
        if prompt.trim().is_empty() {
            return Err(TtvError::EmptyPrompt);
        }
        Ok(prompt)
    }
}

impl From<Lesson> for PromptSource {
    fn from(lesson: Lesson) -> Self {
        Self::Lesson(lesson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_keys() {
        let keys: Vec<_> = Lesson::ALL.iter().map(Lesson::key).collect();
        assert_eq!(keys, vec!["solar_system", "water_cycle", "photosynthesis"]);
    }

    #[test]
    fn test_lesson_from_str() {
        assert_eq!("water_cycle".parse::<Lesson>().unwrap(), Lesson::WaterCycle);
        assert!(matches!(
            "volcanoes".parse::<Lesson>(),
            Err(TtvError::UnknownLesson(key)) if key == "volcanoes"
        ));
        // Keys are exact; titles are not accepted.
        assert!("Water Cycle".parse::<Lesson>().is_err());
    }

    #[test]
    fn test_lesson_prompt_text() {
        let prompt = Lesson::WaterCycle.prompt();
        assert!(prompt.starts_with("An educational animation of the water cycle: water evaporating"));
        assert!(prompt.ends_with("with smooth continuous motion and stable subject tracking."));
        assert!(!prompt.contains("  "));
    }

    #[test]
    fn test_lesson_serde_uses_keys() {
        let json = serde_json::to_string(&Lesson::SolarSystem).unwrap();
        assert_eq!(json, r#""solar_system""#);
        let lesson: Lesson = serde_json::from_str(r#""photosynthesis""#).unwrap();
        assert_eq!(lesson, Lesson::Photosynthesis);
    }

    #[test]
    fn test_prompt_source_resolve() {
        assert_eq!(
            PromptSource::Lesson(Lesson::Photosynthesis).resolve(),
            Lesson::Photosynthesis.prompt()
        );
        assert_eq!(PromptSource::FreeText("  a cat  ".into()).resolve(), "  a cat  ");
    }

    #[test]
    fn test_prompt_source_validated() {
        assert!(matches!(
            PromptSource::FreeText(" \t\n".into()).validated(),
            Err(TtvError::EmptyPrompt)
        ));
        assert!(matches!(
            PromptSource::FreeText(String::new()).validated(),
            Err(TtvError::EmptyPrompt)
        ));
        assert_eq!(
            PromptSource::FreeText(" a cat ".into()).validated().unwrap(),
            " a cat "
        );
    }
}
