//! Tool dispatch: from (tool name, JSON arguments) to a reply string.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parley_fraud::{CaseRecord, CaseStore, FraudCall};
use parley_game::GameSession;
use parley_types::BotKind;
use serde_json::Value;

/// One live demo-bot session behind the tool boundary.
pub enum BotSession {
    Narrator {
        game: GameSession,
        /// Directory game saves are written to and loaded from.
        save_dir: PathBuf,
    },
    FraudDesk { call: FraudCall },
}

impl BotSession {
    pub fn narrator(save_dir: impl Into<PathBuf>) -> Self {
        Self::Narrator {
            game: GameSession::new(),
            save_dir: save_dir.into(),
        }
    }

    pub fn fraud_desk(directory: Arc<Vec<CaseRecord>>, store: Arc<dyn CaseStore>) -> Self {
        Self::FraudDesk {
            call: FraudCall::new(directory, store),
        }
    }

    pub fn kind(&self) -> BotKind {
        match self {
            Self::Narrator { .. } => BotKind::Narrator,
            Self::FraudDesk { .. } => BotKind::FraudDesk,
        }
    }

    /// The line the agent speaks when the call connects.
    pub fn opening_line(&mut self) -> String {
        match self {
            Self::Narrator { game, .. } => game.session_status(),
            Self::FraudDesk { call } => call.opening_line().message,
        }
    }

    /// Winds the session down, returning the closing line.
    pub fn close(&mut self) -> String {
        match self {
            Self::Narrator { game, .. } => game.end_game(),
            Self::FraudDesk { call } => call.end_call().message,
        }
    }
}

/// Reads a string argument, tolerating absent keys and non-string values.
fn str_arg(args: &Value, key: &str) -> String {
    match args.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Reads an integer argument, tolerating strings and absent keys.
fn int_arg(args: &Value, key: &str, default: i64) -> i64 {
    match args.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// Invokes a tool on a session.
///
/// This is the whole contract with the orchestrator: arguments are
/// whatever the language model extracted from conversation, and the only
/// output channel is the returned string. Unknown tools and missing
/// arguments degrade to corrective messages; nothing here panics or
/// propagates an error.
pub fn dispatch(session: &mut BotSession, tool: &str, args: &Value) -> String {
    tracing::debug!(bot = %session.kind(), tool, "dispatching tool invocation");

    match session {
        BotSession::Narrator { game, save_dir } => dispatch_narrator(game, save_dir, tool, args),
        BotSession::FraudDesk { call } => dispatch_fraud(call, tool, args),
    }
}

fn dispatch_narrator(game: &mut GameSession, save_dir: &Path, tool: &str, args: &Value) -> String {
    match tool {
        "check_session_status" => game.session_status(),
        "select_scenario" => game.select_scenario(&str_arg(args, "scenario")),
        "roll_dice" => {
            let sides = int_arg(args, "sides", i64::from(parley_game::tools::DEFAULT_DICE_SIDES));
            game.roll_dice(sides.clamp(2, 1000) as u32)
        }
        "skill_check" => {
            let skill = str_arg(args, "skill");
            let difficulty = int_arg(args, "difficulty", 0).clamp(0, 10) as i32;
            game.skill_check(&skill, difficulty)
        }
        "check_inventory" => game.check_inventory(),
        "check_status" => game.check_status(),
        "add_item" => game.add_item(&str_arg(args, "item")),
        "update_hp" => game.update_hp(int_arg(args, "change", 0) as i32),
        "update_location" => game.update_location(&str_arg(args, "location")),
        "save_progress" => game.save_progress(&str_arg(args, "event")),
        "update_npc" => game.update_npc(
            &str_arg(args, "name"),
            &str_arg(args, "status"),
            &str_arg(args, "attitude"),
        ),
        "add_quest" => game.add_quest(&str_arg(args, "quest")),
        "complete_quest" => game.complete_quest(&str_arg(args, "quest")),
        "save_game" => game.save_game(save_dir),
        "load_game" => {
            let requested = str_arg(args, "filename");
            // Saves live in one directory; only the file name component
            // of whatever the model produced is honored.
            match Path::new(&requested).file_name() {
                Some(file_name) => game.load_game(&save_dir.join(file_name)),
                None => "Which save file should I load?".to_string(),
            }
        }
        "restart_game" => game.restart_game(),
        "end_game" => game.end_game(),
        _ => unknown_tool(BotKind::Narrator, tool),
    }
}

fn dispatch_fraud(call: &mut FraudCall, tool: &str, args: &Value) -> String {
    match tool {
        "lookup_case" => call.lookup_case(&str_arg(args, "name")).message,
        "verify_step" => call.verify_step(&str_arg(args, "answer")).message,
        "record_decision" => call.record_decision(&str_arg(args, "decision")).message,
        "end_call" => call.end_call().message,
        _ => unknown_tool(BotKind::FraudDesk, tool),
    }
}

fn unknown_tool(bot: BotKind, tool: &str) -> String {
    tracing::warn!(bot = %bot, tool, "unknown tool invoked");
    format!("Tool '{tool}' is not available for this agent; nothing was changed.")
}
