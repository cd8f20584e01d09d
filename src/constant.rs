/// pieces of the prompt sent to the completion API
pub mod prompt {
    pub const PREFIX: &str = "Question: ";
    pub const SUFFIX: &str = "\nlisbun:";
}

/// fixed replies used when no completion can be relayed
pub mod reply {
    pub const UNEXPECTED_RESPONSE: &str =
        "The response from the AI was unexpected. Please try again.";
    pub const SOMETHING_WENT_WRONG: &str =
        "Sorry, something went wrong. I am unable to process your query.";
}

/// environment variables that override the configuration file
pub mod env {
    pub const BOT_TOKEN: &str = "BOT_TOKEN";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
}
