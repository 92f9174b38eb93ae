//! Built-in refiner tools.

use serde::Serialize;

/// A named rewriting strategy.
///
/// Serializing a tool omits its instruction, which is only sent to the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RefinerTool {
    /// Stable identifier used by callers.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Emoji shown next to the name.
    pub icon: &'static str,
    /// Instruction placed ahead of the prompt being refined.
    #[serde(skip)]
    pub instruction: &'static str,
    /// Short description for pickers.
    pub description: &'static str,
    /// Accent colour name.
    pub color: &'static str,
}

static REFINER_TOOLS: [RefinerTool; 8] = [
    RefinerTool {
        id: "concise",
        name: "Make Concise",
        icon: "✂️",
        instruction: "Optimize the following prompt to be more concise while preserving all key information and instructions:",
        description: "Remove unnecessary words and make it shorter",
        color: "blue",
    },
    RefinerTool {
        id: "specific",
        name: "More Specific",
        icon: "🎯",
        instruction: "Enhance the following prompt with more specific instructions and clearer expectations:",
        description: "Add clarity and specificity to reduce ambiguity",
        color: "green",
    },
    RefinerTool {
        id: "friendly",
        name: "Make Friendly",
        icon: "😊",
        instruction: "Rewrite the following prompt with a more friendly, conversational, and approachable tone:",
        description: "Add warmth and conversational tone",
        color: "green",
    },
    RefinerTool {
        id: "professional",
        name: "Make Professional",
        icon: "👔",
        instruction: "Rewrite the following prompt with a more formal, professional, and business-appropriate tone:",
        description: "Add formal language and professional structure",
        color: "blue",
    },
    RefinerTool {
        id: "structured",
        name: "Better Structure",
        icon: "🏗️",
        instruction: "Restructure the following prompt with better organization, clear sections, and logical flow:",
        description: "Improve organization and readability",
        color: "indigo",
    },
    RefinerTool {
        id: "context",
        name: "Add Context",
        icon: "📋",
        instruction: "Enhance the following prompt by adding relevant context, background information, and examples:",
        description: "Add more comprehensive context and examples",
        color: "orange",
    },
    RefinerTool {
        id: "constraints",
        name: "Add Constraints",
        icon: "⚙️",
        instruction: "Improve the following prompt by adding appropriate constraints, format requirements, and output specifications:",
        description: "Add technical constraints and output format guidance",
        color: "gray",
    },
    RefinerTool {
        id: "roleplay",
        name: "Role-based",
        icon: "🎭",
        instruction: "Transform the following prompt to include role-playing instructions and persona-based guidance:",
        description: "Add role-playing elements and persona guidance",
        color: "purple",
    },
];

/// Returns every refiner tool in display order.
#[must_use]
pub fn tools() -> &'static [RefinerTool] {
    &REFINER_TOOLS
}

/// Looks up a tool by identifier.
#[must_use]
pub fn find_tool(id: &str) -> Option<&'static RefinerTool> {
    REFINER_TOOLS.iter().find(|tool| tool.id == id)
}
