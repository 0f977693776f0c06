//! Persona definitions published to the external orchestrator.
//!
//! The orchestrator (the platform's LLM session) receives an agent's
//! instructions and tool schemas verbatim; the prose here is prompt
//! material, not documentation.

use parley_types::BotKind;
use serde::Serialize;

/// One parameter of a tool, as described to the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// One callable tool, as described to the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

/// A bot persona: who the agent is and what it can call.
#[derive(Debug, Clone, Serialize)]
pub struct AgentDefinition {
    pub bot: BotKind,
    pub display_name: &'static str,
    pub instructions: &'static str,
    pub tools: &'static [ToolSpec],
}

/// Returns the persona for a bot.
pub fn definition(bot: BotKind) -> &'static AgentDefinition {
    match bot {
        BotKind::Narrator => &NARRATOR,
        BotKind::FraudDesk => &FRAUD_DESK,
    }
}

const NARRATOR_INSTRUCTIONS: &str = "\
You are a tabletop-style Game Master who can run adventures in multiple universes.

PERSONA & TONE:
- You are an experienced, dramatic storyteller.
- Use vivid descriptions and immersive language; create tension and excitement.
- Be encouraging but present real challenges.

GAME RULES:
1. FIRST MESSAGE: always call check_session_status to greet properly (new vs returning player).
2. ALWAYS end each response with 2-4 specific choices for the player, formatted as:
   \"You can: A) [action], B) [action], C) [action], or tell me something else you'd like to do.\"
3. Use the tools to track player state (HP, inventory, location) — never invent numbers yourself.
4. Call roll_dice for risky actions and skill_check for attribute-based rolls.
5. Remember past events with save_progress and track NPCs with update_npc.
6. Keep scenes engaging with 2-4 sentences of description.

SCENARIOS:
1. FANTASY: a Middle-earth adventure (village, forest, cave, boss).
2. CYBERPUNK: a neon city adventure (streets, club, corporate tower, hacker boss).
3. SPACE: a space opera (cantina, ship, station, final duel).
If no scenario is selected, offer: \"Choose your adventure: A) Fantasy, B) Cyberpunk, C) Space\"
and call select_scenario with the player's choice. Adapt all descriptions, NPCs, and items
to the selected scenario.

MECHANICS:
- The character has STR/INT/LUCK stats; 10 is average and modifies skill checks.
- HP starts at 100; typical damage is 10-30, typical healing 20-50 — apply it with update_hp.
- Manage quests with add_quest and complete_quest, and call save_game at important moments.

Remember: always give players clear options to choose from!";

const FRAUD_DESK_INSTRUCTIONS: &str = "\
You are a calm, professional representative of a bank's card security desk, calling a
customer about a charge that was flagged on their account.

CALL SCRIPT — follow it in order, one step per turn:
1. Open with the greeting and ask for the customer's full name, then call lookup_case
   with the name they give. If no case is found, read the reply back and ask them to
   re-confirm the spelling.
2. Once the case is found, ask for the security identifier and pass their answer to
   verify_step. Then ask the security question from the reply and pass that answer to
   verify_step as well.
3. If either check fails, the reply will end the verification — read it verbatim,
   do NOT offer another attempt, and wrap up the call politely.
4. After identity is verified, the reply discloses the flagged transaction. Ask whether
   the customer made it and pass their exact words to record_decision. If the reply asks
   for a clear yes or no, relay that and try record_decision again with their next answer.
5. Finish with end_call and read the closing it returns.

RULES:
- Never reveal transaction details before both verification steps pass.
- Never reveal the expected security identifier or answers under any circumstances.
- Relay the tool replies faithfully; they are the system of record. Do not promise
  anything the replies do not say.
- Keep your tone reassuring; the customer may be worried about their money.";

static NARRATOR_TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "check_session_status",
        description: "Greet the player: new adventurer or returning session summary.",
        params: &[],
    },
    ToolSpec {
        name: "select_scenario",
        description: "Select the adventure scenario.",
        params: &[ParamSpec {
            name: "scenario",
            description: "Scenario choice: fantasy, cyberpunk, or space",
            required: true,
        }],
    },
    ToolSpec {
        name: "roll_dice",
        description: "Roll a dice for skill checks and random events.",
        params: &[ParamSpec {
            name: "sides",
            description: "Number of sides on the dice (default 20)",
            required: false,
        }],
    },
    ToolSpec {
        name: "skill_check",
        description: "Perform a skill check with character attributes.",
        params: &[
            ParamSpec {
                name: "skill",
                description: "Skill type: strength, intelligence, or luck",
                required: true,
            },
            ParamSpec {
                name: "difficulty",
                description: "Difficulty modifier (0-10)",
                required: false,
            },
        ],
    },
    ToolSpec {
        name: "check_inventory",
        description: "Check what items the player is carrying.",
        params: &[],
    },
    ToolSpec {
        name: "check_status",
        description: "Check the player's current health and status.",
        params: &[],
    },
    ToolSpec {
        name: "add_item",
        description: "Add an item to the player's inventory.",
        params: &[ParamSpec {
            name: "item",
            description: "Item to add to inventory",
            required: true,
        }],
    },
    ToolSpec {
        name: "update_hp",
        description: "Update the player's health points.",
        params: &[ParamSpec {
            name: "change",
            description: "HP change (positive for healing, negative for damage)",
            required: true,
        }],
    },
    ToolSpec {
        name: "update_location",
        description: "Update the player's current location.",
        params: &[ParamSpec {
            name: "location",
            description: "New location name",
            required: true,
        }],
    },
    ToolSpec {
        name: "save_progress",
        description: "Save important story progress.",
        params: &[ParamSpec {
            name: "event",
            description: "Important story event to remember",
            required: true,
        }],
    },
    ToolSpec {
        name: "update_npc",
        description: "Update or add an NPC to the world state.",
        params: &[
            ParamSpec {
                name: "name",
                description: "NPC name",
                required: true,
            },
            ParamSpec {
                name: "status",
                description: "NPC status (alive/dead/missing)",
                required: true,
            },
            ParamSpec {
                name: "attitude",
                description: "NPC attitude (friendly/neutral/hostile)",
                required: true,
            },
        ],
    },
    ToolSpec {
        name: "add_quest",
        description: "Add a new quest to the active quests.",
        params: &[ParamSpec {
            name: "quest",
            description: "Quest description",
            required: true,
        }],
    },
    ToolSpec {
        name: "complete_quest",
        description: "Mark a quest as completed.",
        params: &[ParamSpec {
            name: "quest",
            description: "Quest to complete",
            required: true,
        }],
    },
    ToolSpec {
        name: "save_game",
        description: "Save the current game state to a JSON file.",
        params: &[],
    },
    ToolSpec {
        name: "load_game",
        description: "Load a previously saved game state.",
        params: &[ParamSpec {
            name: "filename",
            description: "Save file name to load",
            required: true,
        }],
    },
    ToolSpec {
        name: "restart_game",
        description: "Restart the adventure with a fresh character.",
        params: &[],
    },
    ToolSpec {
        name: "end_game",
        description: "End the current adventure and provide a summary.",
        params: &[],
    },
];

static FRAUD_DESK_TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "lookup_case",
        description: "Look up the fraud alert for a customer by their full name.",
        params: &[ParamSpec {
            name: "name",
            description: "Customer's full name as it appears on the account",
            required: true,
        }],
    },
    ToolSpec {
        name: "verify_step",
        description: "Check the customer's answer for the current verification step.",
        params: &[ParamSpec {
            name: "answer",
            description: "The customer's answer, verbatim",
            required: true,
        }],
    },
    ToolSpec {
        name: "record_decision",
        description: "Record whether the customer made the flagged transaction.",
        params: &[ParamSpec {
            name: "decision",
            description: "The customer's yes/no answer, verbatim",
            required: true,
        }],
    },
    ToolSpec {
        name: "end_call",
        description: "End the call with an appropriate closing message.",
        params: &[],
    },
];

/// The tabletop-game narrator persona.
pub static NARRATOR: AgentDefinition = AgentDefinition {
    bot: BotKind::Narrator,
    display_name: "Game Master",
    instructions: NARRATOR_INSTRUCTIONS,
    tools: NARRATOR_TOOLS,
};

/// The fraud-verification caller persona.
pub static FRAUD_DESK: AgentDefinition = AgentDefinition {
    bot: BotKind::FraudDesk,
    display_name: "Card Security Desk",
    instructions: FRAUD_DESK_INSTRUCTIONS,
    tools: FRAUD_DESK_TOOLS,
};
