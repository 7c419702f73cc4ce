const BODY_START: &str = "BEGIN";
const BODY_END: &str = "END";

/// Return the executable body of a procedure definition.
///
/// Takes the text between the first `BEGIN` and the last `END`, trimmed.
/// This is a literal substring search: nested blocks are not tracked, so
/// statements after an inner `END` stay in the body. A missing `BEGIN`
/// starts the body at the beginning of the text, a missing `END` runs it
/// to the end, and an `END` that precedes the body yields an empty string.
///
/// # Examples
///
/// ```
/// use procschema::extract_procedure_body;
///
/// assert_eq!(extract_procedure_body("CREATE PROC p AS BEGIN SELECT 1 END"), "SELECT 1");
/// ```
pub fn extract_procedure_body(definition: &str) -> &str {
    let start = definition
        .find(BODY_START)
        .map(|idx| idx + BODY_START.len())
        .unwrap_or(0);
    let end = definition.rfind(BODY_END).unwrap_or(definition.len());

    if end <= start {
        return "";
    }

    definition[start..end].trim()
}
