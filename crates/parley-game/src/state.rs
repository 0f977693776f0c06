//! Player, world, and quest state for a narrator session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The adventure settings the narrator can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Middle-earth style fantasy adventure.
    Fantasy,
    /// Neon-city cyberpunk adventure.
    Cyberpunk,
    /// Space-opera adventure.
    Space,
}

impl Scenario {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fantasy => "fantasy",
            Self::Cyberpunk => "cyberpunk",
            Self::Space => "space",
        }
    }

    /// Attempts to parse a player's scenario choice.
    pub fn from_choice(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fantasy" => Some(Self::Fantasy),
            "cyberpunk" => Some(Self::Cyberpunk),
            "space" => Some(Self::Space),
            _ => None,
        }
    }

    /// One-line pitch read to the player when the scenario is chosen.
    pub fn description(self) -> &'static str {
        match self {
            Self::Fantasy => "a Middle-earth fantasy adventure",
            Self::Cyberpunk => "a neon-soaked cyberpunk city adventure",
            Self::Space => "a space opera among the stars",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-player character the story has introduced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcRecord {
    /// alive / dead / missing.
    pub status: String,
    /// friendly / neutral / hostile.
    pub attitude: String,
    /// Where the NPC was last seen.
    pub location: String,
}

/// The player's character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCharacter {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub strength: i32,
    pub intelligence: i32,
    pub luck: i32,
    pub inventory: Vec<String>,
    pub location: String,
    pub status: String,
}

impl Default for PlayerCharacter {
    fn default() -> Self {
        Self {
            name: "Adventurer".to_string(),
            hp: 100,
            max_hp: 100,
            strength: 10,
            intelligence: 10,
            luck: 10,
            inventory: Vec::new(),
            location: "Village Square".to_string(),
            status: "Healthy".to_string(),
        }
    }
}

impl PlayerCharacter {
    /// Looks up an attribute by skill name. Unknown skills get the
    /// neutral baseline so a mistyped skill check still rolls.
    pub fn attribute(&self, skill: &str) -> i32 {
        match skill.trim().to_lowercase().as_str() {
            "strength" => self.strength,
            "intelligence" => self.intelligence,
            "luck" => self.luck,
            _ => 10,
        }
    }
}

/// Everything a narrator session tracks between turns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: PlayerCharacter,
    /// Story events the narrator asked to remember, oldest first.
    pub story_progress: Vec<String>,
    pub game_started: bool,
    pub selected_scenario: Option<Scenario>,
    /// NPCs keyed by name. A BTreeMap keeps save files diff-stable.
    pub npcs: BTreeMap<String, NpcRecord>,
    pub active_quests: Vec<String>,
    pub completed_quests: Vec<String>,
}

impl GameState {
    /// Whether any progress has been made since the session started.
    /// Drives the new-vs-returning greeting.
    pub fn has_progress(&self) -> bool {
        !self.story_progress.is_empty()
            || self.selected_scenario.is_some()
            || !self.player.inventory.is_empty()
            || self.player.hp != self.player.max_hp
            || !self.active_quests.is_empty()
            || !self.completed_quests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_has_no_progress() {
        assert!(!GameState::default().has_progress());
    }

    #[test]
    fn any_touched_field_counts_as_progress() {
        let mut with_item = GameState::default();
        with_item.player.inventory.push("torch".to_string());
        assert!(with_item.has_progress());

        let mut with_damage = GameState::default();
        with_damage.player.hp = 85;
        assert!(with_damage.has_progress());

        let mut with_quest = GameState::default();
        with_quest.active_quests.push("Find the heirloom".to_string());
        assert!(with_quest.has_progress());
    }

    #[test]
    fn scenario_choice_parsing() {
        assert_eq!(Scenario::from_choice(" Fantasy "), Some(Scenario::Fantasy));
        assert_eq!(Scenario::from_choice("CYBERPUNK"), Some(Scenario::Cyberpunk));
        assert_eq!(Scenario::from_choice("space"), Some(Scenario::Space));
        assert_eq!(Scenario::from_choice("western"), None);
    }

    #[test]
    fn unknown_skill_uses_neutral_attribute() {
        let player = PlayerCharacter {
            strength: 14,
            ..Default::default()
        };
        assert_eq!(player.attribute("strength"), 14);
        assert_eq!(player.attribute("charisma"), 10);
    }
}
