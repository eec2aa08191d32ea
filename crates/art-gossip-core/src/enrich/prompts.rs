//! Prompt templates for the three generation stages.

pub(super) const SYSTEM_PROMPT: &str = "You are a witty art historian and auction specialist \
writing for a casual social media audience. Answer with exactly what is asked and nothing else.";

pub(super) fn description(details: &str) -> String {
    format!(
        "Here is everything known about an artwork:\n\n{details}\n\n\
         Write a fun, gossipy short description of this artwork in plain text, \
         under 400 characters. Share an interesting fact or bit of context. \
         Do not mention missing information, do not describe what you are doing, \
         and do not use markdown. Emojis are fine."
    )
}

pub(super) fn price_range(details: &str) -> String {
    format!(
        "Here is everything known about an artwork:\n\n{details}\n\n\
         Estimate what this artwork might sell for at auction today. \
         Respond with ONLY a price range in US dollars formatted like \"$X - $Y\". \
         Always give an estimate, even if the information is sparse."
    )
}

pub(super) fn single_price(details: &str, range: &str) -> String {
    format!(
        "Here is everything known about an artwork:\n\n{details}\n\n\
         Its estimated auction price range is {range}. \
         Respond with ONLY a single price in US dollars formatted like \"$X\" \
         that falls within that range. It does not have to be the midpoint."
    )
}
