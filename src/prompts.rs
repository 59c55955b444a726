//! The small LLM tools: ELI5, email tone fixer, gift ideas and recipes.
//!
//! Each tool validates its input, fills a prompt template and renders the
//! completion as Markdown.  None of them keep any state between calls.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::llm::{complete_or_error, Completion, CompletionRequest};

pub const COMPLEX_TOPICS: &[&str] = &[
    // Science
    "quantum entanglement",
    "black holes",
    "DNA replication",
    "how vaccines work",
    "theory of relativity",
    "photosynthesis",
    "the Big Bang",
    "dark matter",
    "evolution by natural selection",
    "how airplanes fly",
    // Technology
    "blockchain",
    "machine learning",
    "encryption",
    "how the internet works",
    "cloud computing",
    "neural networks",
    "how GPS works",
    "quantum computing",
    "how WiFi works",
    "cryptocurrency mining",
    // Economics & society
    "inflation",
    "stock market",
    "supply and demand",
    "compound interest",
    "how banks create money",
    "cryptocurrency",
    "the Federal Reserve",
    "GDP",
    "trade deficits",
    "index funds",
    // Philosophy & psychology
    "the trolley problem",
    "cognitive dissonance",
    "Plato's cave allegory",
    "the butterfly effect",
    "Occam's razor",
    "confirmation bias",
    "the Dunning-Kruger effect",
    "stoicism",
    "existentialism",
    "the prisoner's dilemma",
    // Math
    "probability",
    "the Fibonacci sequence",
    "prime numbers",
    "calculus (derivatives)",
    "the Pythagorean theorem",
    "exponential growth",
    "the Monty Hall problem",
    "infinity",
    "the golden ratio",
    "statistics vs probability",
    // Space
    "how stars are born",
    "why is the sky blue",
    "how seasons work",
    "tides and the moon",
    "what is gravity",
    "the speed of light",
    "parallel universes",
    "time dilation",
    "why planets are round",
    "asteroid vs comet vs meteor",
    // Health & body
    "how muscles grow",
    "why we dream",
    "how memory works",
    "the immune system",
    "how caffeine works",
    "what causes cancer",
    "how antidepressants work",
    "the gut-brain connection",
    "why we age",
    "how sleep restores the body",
    // Everyday things
    "how microwaves heat food",
    "why ice floats",
    "how touchscreens work",
    "why we yawn",
    "how soap cleans",
    "why the sky is dark at night",
    "how magnets work",
    "why we get hiccups",
    "how refrigerators work",
    "why we have fingerprints",
];

/// Pick a random ELI5 topic.
pub fn random_topic(rng: &mut impl Rng) -> &'static str {
    COMPLEX_TOPICS.choose(rng).copied().unwrap_or("black holes")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Eli5,
    EmailTone,
    GiftIdeas,
    Recipes,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Eli5, Tool::EmailTone, Tool::GiftIdeas, Tool::Recipes];

    pub fn title(self) -> &'static str {
        match self {
            Tool::Eli5 => "🧒 ELI5 — Explain Like I'm 5",
            Tool::EmailTone => "✉️ Email Tone Fixer",
            Tool::GiftIdeas => "🎁 Gift Idea Generator",
            Tool::Recipes => "🍳 Recipe from Fridge",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            Tool::Eli5 => "Learn something new in the simplest way possible!",
            Tool::EmailTone => "Turn awkward emails into professional ones!",
            Tool::GiftIdeas => "Thoughtful gifts without the stress!",
            Tool::Recipes => "What's for dinner? Let's find out!",
        }
    }

    pub fn input_label(self) -> &'static str {
        match self {
            Tool::Eli5 => "Enter any topic (blank for a surprise)",
            Tool::EmailTone => "Paste your email draft",
            Tool::GiftIdeas => "Describe the person",
            Tool::Recipes => "What's in your fridge?",
        }
    }

    /// Reply shown instead of calling the LLM when the input is blank.
    /// ELI5 has none: a blank topic means "surprise me".
    pub fn empty_input_message(self) -> Option<&'static str> {
        match self {
            Tool::Eli5 => None,
            Tool::EmailTone => Some("Please paste your email!"),
            Tool::GiftIdeas => Some("Please describe the person!"),
            Tool::Recipes => Some("Please list your ingredients!"),
        }
    }

    pub fn prompt(self, input: &str) -> String {
        match self {
            Tool::Eli5 => eli5_prompt(input),
            Tool::EmailTone => format!(
                "Rewrite this email to be professional, polite, and clear. \n\
                 Keep the same meaning but fix any awkward or aggressive tone.\n\n\
                 Original email:\n{input}\n\nRewritten email:"
            ),
            Tool::GiftIdeas => format!(
                "Based on this description, suggest 5 thoughtful gift ideas \
                 with brief explanations:\n\n\
                 {input}\n\n\
                 Format each as:\n🎁 **Gift Name** ($price range) - Why it's perfect"
            ),
            Tool::Recipes => format!(
                "I have these ingredients: {input}\n\n\
                 Suggest 3 easy recipes I can make. For each:\n\
                 🍳 **Recipe Name**\n\
                 - Ingredients needed (mark if I'm missing any)\n\
                 - Quick steps (5 or fewer)\n\
                 - Time to cook"
            ),
        }
    }

    pub fn request(self, input: &str) -> CompletionRequest {
        let (max_tokens, temperature) = match self {
            Tool::Eli5 | Tool::EmailTone => (500, 0.7),
            Tool::GiftIdeas => (500, 0.8),
            Tool::Recipes => (600, 0.8),
        };
        CompletionRequest::new(self.prompt(input))
            .max_tokens(max_tokens)
            .temperature(temperature)
            .timeout(Duration::from_secs(60))
    }

    /// Validate `input`, ask `llm`, and render the answer as Markdown.
    pub fn run(self, llm: &dyn Completion, input: &str, rng: &mut impl Rng) -> String {
        let input = input.trim();
        match self {
            Tool::Eli5 => {
                let topic = if input.is_empty() { random_topic(rng) } else { input };
                let explanation = complete_or_error(llm, &self.request(topic));
                format!("## 🧒 {}\n\n{explanation}", topic.to_uppercase())
            }
            _ => match self.empty_input_message() {
                Some(message) if input.is_empty() => message.to_string(),
                _ => complete_or_error(llm, &self.request(input)),
            },
        }
    }
}

fn eli5_prompt(topic: &str) -> String {
    format!(
        "Explain \"{topic}\" like I'm 5 years old.\n\n\
         Rules:\n\
         - Use simple words a child would understand\n\
         - Use a fun analogy or comparison to everyday things\n\
         - Keep it to 3-4 short paragraphs\n\
         - End with a fun fact or \"wow\" moment\n\
         - Be enthusiastic and make it fun!\n\n\
         Start with: \"Imagine...\" or \"You know how...\" "
    )
}
