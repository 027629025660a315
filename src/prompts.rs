//! Prompt construction for scenario generation and decision analysis.
//!
//! The difficulty descriptors and diversity rules are instructions to the
//! model. They bias what comes back; nothing here checks that the output
//! actually follows them.

use crate::model::{Difficulty, Scenario, TrackId};

/// Temperature for the top difficulty tier.
pub const CHAOS_TEMPERATURE: f64 = 1.2;

/// Temperature for every other tier.
pub const STANDARD_TEMPERATURE: f64 = 1.0;

/// How the dilemma should feel at a given tier.
pub fn difficulty_descriptor(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => {
            "Difficulty: EASY. Consequences are clear and explicit, usually a simple \
             trade-off in numbers (for example 1 versus 5). No hidden information. \
             Suitable for beginners."
        }
        Difficulty::Medium => {
            "Difficulty: MEDIUM. Add social identities (a doctor, a criminal) or mild \
             uncertainty, so the choice is no longer just a numbers game."
        }
        Difficulty::Hard => {
            "Difficulty: HARD. Highly controversial: family ties, future potential or \
             long causal chains. There is no obvious better option and the choice \
             should feel agonizing."
        }
        Difficulty::Extreme => {
            "Difficulty: EXTREME. Deeply abstract, absurd or epic in scale (all of \
             humanity, time paradoxes, machine consciousness). Push human ethics to \
             its limits, meta-cognitive elements welcome."
        }
        Difficulty::Chaos => {
            "Difficulty: CHAOS. Internet memes, absurdist in-jokes, breaking the fourth \
             wall, glitch aesthetics or completely absurd logic. Victims may be concepts, \
             meme characters, server code or philosophical ideas themselves. The tone \
             should be humorous, satirical, surreal or baffling."
        }
    }
}

/// Temperature requested for a tier.
pub fn temperature_for(difficulty: Difficulty) -> f64 {
    if difficulty.is_most_extreme() {
        CHAOS_TEMPERATURE
    } else {
        STANDARD_TEMPERATURE
    }
}

const VICTIM_DIVERSITY_RULES: &str = "\
IMPORTANT - target diversity:
Most of the time (high probability) the targets on the tracks should be humans (HUMAN).
With a lower probability (roughly 10%-20%) introduce non-human targets to make the scene \
more interesting or absurd, for example:
- ANIMAL: pets, rare species, stray cats and dogs
- ROBOT: robots, AI servers, synthetic humans
- PLANT: rare plants, a sacred tree, the last flower
- OBJECT: artifacts, works of art, virtual character data, food (the last slice of pizza)";

const HUMAN_DIVERSITY_RULES: &str = "\
IMPORTANT - human descriptions:
When a target is HUMAN, always give a varied description, never just \"1 person\". \
Combine these dimensions at random:
- Age: from infants and teenagers to centenarians.
- Occupation: not only doctors or workers, e.g. \"an exhausted programmer\", \
\"an unemployed clown\", \"a livestreaming influencer\", \"a future dictator\".
- Temperament or state: \"furious\", \"asleep\", \"ungrateful and cursing\", \
\"innocent and holding a balloon\".
- Motive or activity: \"rushing to a wedding\", \"stealing bread\", \"pondering life\".";

/// Build the instruction for a new scenario.
pub fn scenario_prompt(difficulty: Difficulty, language: &str) -> String {
    format!(
        "Create a unique variant of the trolley problem.\n\
         It may be classic in style, or set in a modern, science-fiction or fantasy world.\n\n\
         {descriptor}\n\n\
         {victims}\n\n\
         {humans}\n\n\
         Include two tracks: Track A is the default (nothing is done), \
         Track B is the outcome after the lever is pulled.\n\
         Output JSON only. Write all text in {language}.",
        descriptor = difficulty_descriptor(difficulty),
        victims = VICTIM_DIVERSITY_RULES,
        humans = HUMAN_DIVERSITY_RULES,
        language = language,
    )
}

/// Build the instruction for judging a decision.
pub fn analysis_prompt(scenario: &Scenario, choice: TrackId, language: &str) -> String {
    let chosen = scenario.track(choice);

    format!(
        "Scenario: {title}\n\
         Context: {context}\n\
         Track A (no intervention): {track_a}\n\
         Track B (intervention): {track_b}\n\
         User's choice: {action} -> {outcome}\n\n\
         Tasks:\n\
         1. Identify the philosophical school behind the choice, contrasting the \
         utilitarian and the deontological reading, and describe the psychological motives.\n\
         2. Relate the choice to classic trolley-problem cases and estimate how people \
         around the world tend to choose.\n\
         3. Decide independently which track you would choose (aiChoice: 'track_a' | 'track_b') \
         and explain why. Your choice does not need to agree with the user's.\n\
         Output JSON only. Write all text in {language}.",
        title = scenario.title,
        context = scenario.context,
        track_a = scenario.track_a.description,
        track_b = scenario.track_b.description,
        action = choice.action(),
        outcome = chosen.description,
        language = language,
    )
}
