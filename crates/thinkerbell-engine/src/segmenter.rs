//! Sentence segmentation
//!
//! A pure lexical step: split raw text on runs of sentence-terminal
//! punctuation, trim, and drop empty candidates. Length filtering is the
//! router's policy, not the segmenter's.

/// Split raw text into candidate sentences.
///
/// A boundary is one or more consecutive `.`, `!`, or `?` characters
/// followed by whitespace. A terminator glued to the next character, such
/// as the decimal point in `3.5`, does not split, and a run at the end of
/// input stays attached to the final sentence so downstream punctuation
/// heuristics can see it. The same input always yields the same output; no
/// state is carried between calls.
pub fn segment(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if !is_terminator(ch) {
            current.push(ch);
            continue;
        }

        let mut run = String::new();
        run.push(ch);
        while let Some(&next) = chars.peek() {
            if is_terminator(next) {
                run.push(next);
                chars.next();
            } else {
                break;
            }
        }

        let at_boundary = matches!(chars.peek(), Some(next) if next.is_whitespace());

        if at_boundary {
            push_trimmed(&mut sentences, &current);
            current.clear();
        } else {
            current.push_str(&run);
        }
    }
    push_trimmed(&mut sentences, &current);

    sentences
}

fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

fn push_trimmed(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
