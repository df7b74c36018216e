use crate::error::{AnalyzerError, Result};

const SYSTEM_INSTRUCTIONS: &str = concat!(
    "**System Instructions:**\n",
    "You are a smart Vision assistant who will take video as input and generate a textual response based on the query.\n",
    "- Analyze the video and provide comprehensive, detailed responses.\n",
    "- If the query mentions 'transcribe' or 'timestamps', then return timestamps in hh:mm format.\n",
    "  \n",
);

/// Reject queries that are empty or only whitespace.
pub fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(AnalyzerError::EmptyQuery);
    }
    Ok(())
}

/// Prefix the user's query with the fixed system instructions. The query is kept verbatim.
pub fn compose_prompt(query: &str) -> String {
    format!("{SYSTEM_INSTRUCTIONS}**User Query:** {query}")
}
