//! The narrator's tools: state mutations invoked one per conversational
//! turn, each returning the string the orchestrator reads back.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::save::GameSave;
use crate::state::{GameState, NpcRecord, Scenario};

/// Dice default when the orchestrator does not specify one.
pub const DEFAULT_DICE_SIDES: u32 = 20;

/// One narrator session: world state plus the dice.
///
/// The RNG is owned by the session so tests can seed it and assert on
/// exact roll outcomes.
pub struct GameSession {
    state: GameState,
    rng: StdRng,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            state: GameState::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// A session with a deterministic dice sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            state: GameState::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Rolls a die for skill checks and random events.
    pub fn roll_dice(&mut self, sides: u32) -> String {
        let sides = sides.max(2);
        let result = self.rng.gen_range(1..=sides);
        tracing::info!(result, sides, "dice roll");
        format!("You rolled a {result} on a d{sides}!")
    }

    /// Performs an attribute-based skill check.
    ///
    /// d20 + (attribute − 10) − difficulty, banded into critical success
    /// (≥16), success (≥11), partial success (≥6), and failure.
    pub fn skill_check(&mut self, skill: &str, difficulty: i32) -> String {
        let base_roll = self.rng.gen_range(1..=20);
        let attr_bonus = self.state.player.attribute(skill) - 10;
        let total = base_roll + attr_bonus - difficulty;

        let result = if total >= 16 {
            "Critical Success!"
        } else if total >= 11 {
            "Success"
        } else if total >= 6 {
            "Partial Success"
        } else {
            "Failure"
        };

        tracing::info!(skill, base_roll, attr_bonus, difficulty, total, result, "skill check");
        format!(
            "Rolling {skill} check: {base_roll} + {attr_bonus} - {difficulty} = {total}. {result}"
        )
    }

    /// Lists what the player is carrying.
    pub fn check_inventory(&self) -> String {
        if self.state.player.inventory.is_empty() {
            "Your inventory is empty.".to_string()
        } else {
            format!(
                "You are carrying: {}",
                self.state.player.inventory.join(", ")
            )
        }
    }

    /// Summarizes the character sheet and quest counts.
    pub fn check_status(&self) -> String {
        let p = &self.state.player;
        let mut status = format!(
            "Name: {}\nHP: {}/{}\nSTR: {} | INT: {} | LUCK: {}\nStatus: {}\nLocation: {}",
            p.name, p.hp, p.max_hp, p.strength, p.intelligence, p.luck, p.status, p.location
        );

        if !self.state.active_quests.is_empty() {
            status.push_str(&format!(
                "\nActive Quests: {}",
                self.state.active_quests.len()
            ));
        }
        if !self.state.completed_quests.is_empty() {
            status.push_str(&format!(
                "\nCompleted Quests: {}",
                self.state.completed_quests.len()
            ));
        }
        status
    }

    /// Adds an item to the player's inventory.
    pub fn add_item(&mut self, item: &str) -> String {
        let item = item.trim();
        if item.is_empty() {
            return "There was nothing to pick up.".to_string();
        }
        self.state.player.inventory.push(item.to_string());
        tracing::info!(item, "item added");
        format!("You picked up: {item}")
    }

    /// Applies damage or healing, clamped to 0..=max_hp.
    pub fn update_hp(&mut self, change: i32) -> String {
        let player = &mut self.state.player;
        let old_hp = player.hp;
        player.hp = (player.hp + change).clamp(0, player.max_hp);

        if change > 0 {
            tracing::info!(old_hp, new_hp = player.hp, "hp healed");
            format!(
                "You gained {change} HP! Current HP: {}/{}",
                player.hp, player.max_hp
            )
        } else {
            tracing::info!(old_hp, new_hp = player.hp, "hp damaged");
            format!(
                "You took {} damage! Current HP: {}/{}",
                change.abs(),
                player.hp,
                player.max_hp
            )
        }
    }

    /// Moves the player to a new location.
    pub fn update_location(&mut self, location: &str) -> String {
        let old = std::mem::replace(&mut self.state.player.location, location.trim().to_string());
        tracing::info!(from = %old, to = %self.state.player.location, "location changed");
        format!("You have moved to: {}", self.state.player.location)
    }

    /// Remembers an important story event.
    pub fn save_progress(&mut self, event: &str) -> String {
        self.state.story_progress.push(event.to_string());
        tracing::info!(event, "story progress saved");
        format!("Progress saved: {event}")
    }

    /// Updates or introduces an NPC at the player's current location.
    pub fn update_npc(&mut self, name: &str, status: &str, attitude: &str) -> String {
        self.state.npcs.insert(
            name.to_string(),
            NpcRecord {
                status: status.to_string(),
                attitude: attitude.to_string(),
                location: self.state.player.location.clone(),
            },
        );
        tracing::info!(name, status, attitude, "npc updated");
        format!("NPC {name} is now {status} and {attitude}.")
    }

    /// Adds a quest to the active list.
    pub fn add_quest(&mut self, quest: &str) -> String {
        self.state.active_quests.push(quest.to_string());
        tracing::info!(quest, "quest added");
        format!("New quest: {quest}")
    }

    /// Completes an active quest by exact description.
    pub fn complete_quest(&mut self, quest: &str) -> String {
        match self.state.active_quests.iter().position(|q| q == quest) {
            Some(idx) => {
                let done = self.state.active_quests.remove(idx);
                self.state.completed_quests.push(done);
                tracing::info!(quest, "quest completed");
                format!("Quest completed: {quest}")
            }
            None => format!("Quest '{quest}' not found in active quests."),
        }
    }

    /// Chooses the adventure setting and starts the game.
    pub fn select_scenario(&mut self, choice: &str) -> String {
        match Scenario::from_choice(choice) {
            Some(scenario) => {
                self.state.selected_scenario = Some(scenario);
                self.state.game_started = true;
                tracing::info!(scenario = %scenario, "scenario selected");
                format!(
                    "Scenario selected: {}. Let the adventure begin!",
                    scenario.description()
                )
            }
            None => "Invalid scenario. Choose: fantasy, cyberpunk, or space.".to_string(),
        }
    }

    /// Resets the session to a fresh character.
    pub fn restart_game(&mut self) -> String {
        self.state = GameState::default();
        tracing::info!("game restarted");
        "Game restarted! Ready for a new adventure.".to_string()
    }

    /// Greets a new player, or summarizes where a returning one left off.
    pub fn session_status(&self) -> String {
        if !self.state.has_progress() {
            return "Greetings, brave adventurer! Welcome to the realm of endless \
                    possibilities. I am your Game Master, ready to guide you through epic \
                    tales of heroism and adventure."
                .to_string();
        }

        let p = &self.state.player;
        let mut summary = format!(
            "Welcome back, {}! You're at {} with {}/{} HP. ",
            p.name, p.location, p.hp, p.max_hp
        );
        if let Some(scenario) = self.state.selected_scenario {
            summary.push_str(&format!("Continuing your {scenario} adventure. "));
        }
        if !self.state.active_quests.is_empty() {
            summary.push_str(&format!(
                "You have {} active quest(s). ",
                self.state.active_quests.len()
            ));
        }
        if let Some(last) = self.state.story_progress.last() {
            summary.push_str(&format!("Last event: {last}. "));
        }
        summary.push_str("Ready to continue your adventure!");
        summary
    }

    /// Wraps up the adventure with a summary.
    pub fn end_game(&self) -> String {
        let p = &self.state.player;
        let mut summary = format!(
            "Adventure complete! Your hero {} ended with {}/{} HP at {}.",
            p.name, p.hp, p.max_hp, p.location
        );
        if !self.state.completed_quests.is_empty() {
            summary.push_str(&format!(
                " Completed quests: {}.",
                self.state.completed_quests.len()
            ));
        }
        if !self.state.story_progress.is_empty() {
            let recent: Vec<&str> = self
                .state
                .story_progress
                .iter()
                .rev()
                .take(3)
                .rev()
                .map(String::as_str)
                .collect();
            summary.push_str(&format!(" Key events: {}.", recent.join(", ")));
        }
        summary.push_str(" Thanks for playing! Say 'restart' for a new adventure.");
        summary
    }

    /// Saves the session into `dir` as a timestamped JSON file.
    pub fn save_game(&self, dir: &Path) -> String {
        match GameSave::now(&self.state).write_to_dir(dir) {
            Ok(path) => format!(
                "Game saved as {}",
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            ),
            Err(e) => {
                tracing::warn!("failed to save game: {e}");
                format!("Failed to save game: {e}")
            }
        }
    }

    /// Loads a previously saved session from `path`.
    pub fn load_game(&mut self, path: &Path) -> String {
        match GameSave::read(path) {
            Ok(save) => {
                self.state = save.state;
                self.state.game_started = true;
                format!(
                    "Game loaded successfully! Welcome back, {}. You're at {}.",
                    self.state.player.name, self.state.player.location
                )
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to load game: {e}");
                format!("Failed to load game: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dice_rolls_stay_in_bounds() {
        let mut session = GameSession::seeded(7);
        for _ in 0..200 {
            let msg = session.roll_dice(6);
            let value: u32 = msg
                .strip_prefix("You rolled a ")
                .and_then(|rest| rest.split(' ').next())
                .and_then(|n| n.parse().ok())
                .expect("roll message should carry the value");
            assert!((1..=6).contains(&value), "out of range roll: {msg}");
        }
    }

    #[test]
    fn degenerate_dice_are_clamped() {
        let mut session = GameSession::seeded(7);
        let msg = session.roll_dice(0);
        assert!(msg.contains("on a d2!"), "got: {msg}");
    }

    #[test]
    fn seeded_sessions_roll_identically() {
        let mut a = GameSession::seeded(42);
        let mut b = GameSession::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.roll_dice(20), b.roll_dice(20));
        }
    }

    #[test]
    fn skill_check_applies_attribute_modifier() {
        let mut session = GameSession::seeded(3);
        session.state.player.strength = 14;

        let msg = session.skill_check("strength", 2);
        assert!(msg.contains("+ 4"), "strength bonus missing: {msg}");
        assert!(msg.contains("- 2"), "difficulty missing: {msg}");
    }

    #[test]
    fn hp_clamps_at_zero_and_max() {
        let mut session = GameSession::seeded(1);

        session.update_hp(-250);
        assert_eq!(session.state().player.hp, 0);

        let msg = session.update_hp(500);
        assert_eq!(session.state().player.hp, 100);
        assert!(msg.contains("100/100"), "got: {msg}");
    }

    #[test]
    fn inventory_tools_round_trip() {
        let mut session = GameSession::seeded(1);
        assert_eq!(session.check_inventory(), "Your inventory is empty.");

        session.add_item("rope");
        session.add_item(" lantern ");
        assert_eq!(session.check_inventory(), "You are carrying: rope, lantern");
    }

    #[test]
    fn quest_lifecycle() {
        let mut session = GameSession::seeded(1);
        session.add_quest("Find the heirloom");

        let missing = session.complete_quest("Slay the dragon");
        assert!(missing.contains("not found"), "got: {missing}");
        assert_eq!(session.state().active_quests.len(), 1);

        let done = session.complete_quest("Find the heirloom");
        assert!(done.starts_with("Quest completed"));
        assert!(session.state().active_quests.is_empty());
        assert_eq!(session.state().completed_quests.len(), 1);
    }

    #[test]
    fn npc_records_player_location() {
        let mut session = GameSession::seeded(1);
        session.update_location("Harbor District");
        session.update_npc("Mira", "alive", "friendly");

        let npc = session.state().npcs.get("Mira").expect("npc should exist");
        assert_eq!(npc.location, "Harbor District");
        assert_eq!(npc.attitude, "friendly");
    }

    #[test]
    fn scenario_selection_starts_the_game() {
        let mut session = GameSession::seeded(1);
        assert!(!session.state().game_started);

        let invalid = session.select_scenario("western");
        assert!(invalid.starts_with("Invalid scenario"));
        assert!(!session.state().game_started);

        session.select_scenario("Fantasy");
        assert!(session.state().game_started);
        assert_eq!(session.state().selected_scenario, Some(Scenario::Fantasy));
    }

    #[test]
    fn restart_wipes_progress() {
        let mut session = GameSession::seeded(1);
        session.select_scenario("space");
        session.add_item("blaster");
        session.update_hp(-30);

        session.restart_game();
        assert_eq!(session.state(), &GameState::default());
    }

    #[test]
    fn session_status_distinguishes_new_and_returning() {
        let mut session = GameSession::seeded(1);
        assert!(session.session_status().starts_with("Greetings, brave adventurer"));

        session.select_scenario("cyberpunk");
        session.save_progress("Escaped the precinct");
        let status = session.session_status();
        assert!(status.starts_with("Welcome back"), "got: {status}");
        assert!(status.contains("cyberpunk"));
        assert!(status.contains("Escaped the precinct"));
    }

    #[test]
    fn save_and_load_through_tool_messages() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let mut session = GameSession::seeded(1);
        session.select_scenario("fantasy");
        session.add_item("map");

        let saved = session.save_game(dir.path());
        assert!(saved.starts_with("Game saved as "), "got: {saved}");

        let file = std::fs::read_dir(dir.path())
            .expect("should list temp dir")
            .next()
            .expect("one save file should exist")
            .expect("dir entry should read")
            .path();

        let mut fresh = GameSession::seeded(2);
        let loaded = fresh.load_game(&file);
        assert!(loaded.starts_with("Game loaded successfully"), "got: {loaded}");
        assert_eq!(fresh.state().player.inventory, vec!["map".to_string()]);

        let failed = fresh.load_game(Path::new("/nonexistent/save.json"));
        assert!(failed.starts_with("Failed to load game"), "got: {failed}");
    }
}
