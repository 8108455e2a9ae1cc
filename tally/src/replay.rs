use crate::history::CallLog;
use shared::Result;

/// Render a human-readable transcript of every recorded call of an
/// instrumented operation: an invocation count followed by one
/// `<op>(<input>) -> <output>` line per call, oldest first.
pub async fn replay(log: &CallLog) -> Result<String> {
    let history = log.history().await?;

    let mut transcript = format!("{} was called {} times:\n", log.operation(), history.len());
    for (input, output) in &history {
        transcript.push_str(&format!(
            "{}({}) -> {}\n",
            log.operation(),
            decode(input),
            decode(output)
        ));
    }
    Ok(transcript)
}

/// Decode log bytes as UTF-8, falling back to a raw byte-literal
/// rendition when the entry is not valid text.
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => format!("{:?}", bytes),
    }
}
