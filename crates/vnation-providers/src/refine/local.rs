//! Deterministic local prompt refinement.

/// Word cap for refined prompts.
pub const MAX_REFINED_WORDS: usize = 100;

const CAMERA_SEGMENT: &str =
    "with cinematic lighting, shallow depth of field, and fluid camera movement";
const MOOD_SEGMENT: &str = "conveying a moody, immersive atmosphere.";

/// Rewrite a prompt into a cinematic video prompt without any remote call.
///
/// `Style:` and `Aspect:` lines (case-insensitive) are lifted out of the
/// text and woven back in as phrases. The output ends with a single period
/// and holds at most [`MAX_REFINED_WORDS`] words.
pub fn refine_locally(input: &str) -> String {
    let mut style = None;
    let mut aspect = None;
    let mut core_lines = Vec::new();

    for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(value) = strip_label(line, "style:") {
            style = Some(value);
        } else if let Some(value) = strip_label(line, "aspect:") {
            aspect = Some(value);
        } else {
            core_lines.push(line);
        }
    }

    let joined = core_lines.join(" ");
    let core = match joined.trim() {
        "" => input.trim(),
        core => core,
    };

    let mut parts = vec![core.trim_end_matches('.').to_string()];
    if let Some(style) = style.filter(|s| !s.is_empty()) {
        parts.push(format!("Rendered in a {} style", style));
    }
    parts.push(CAMERA_SEGMENT.to_string());
    if let Some(aspect) = aspect.filter(|a| !a.is_empty()) {
        parts.push(format!("framed for {} aspect ratio", aspect));
    }
    parts.push(MOOD_SEGMENT.to_string());

    let mut refined = parts.join(". ");
    if !refined.ends_with('.') {
        refined.push('.');
    }
    cap_words(refined)
}

/// [`refine_locally`], or the input tagged ` (refined)` if the rewrite panics.
pub fn fallback_refine(input: &str) -> String {
    std::panic::catch_unwind(|| refine_locally(input))
        .unwrap_or_else(|_| format!("{} (refined)", input))
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    if head.eq_ignore_ascii_case(label) {
        Some(line[label.len()..].trim())
    } else {
        None
    }
}

fn cap_words(text: String) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= MAX_REFINED_WORDS {
        return text;
    }

    let mut capped = words[..MAX_REFINED_WORDS].join(" ");
    let keep = capped.trim_end_matches('.').len();
    capped.truncate(keep);
    capped.push('.');
    capped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_and_aspect_are_woven_in() {
        let refined = refine_locally("A lone wolf on a hill\nStyle: watercolor\nAspect: 16:9");
        assert_eq!(
            refined,
            "A lone wolf on a hill. Rendered in a watercolor style. with cinematic lighting, \
             shallow depth of field, and fluid camera movement. framed for 16:9 aspect ratio. \
             conveying a moody, immersive atmosphere."
        );
    }

    #[test]
    fn test_style_line_is_removed() {
        let refined = refine_locally("Rain on neon streets\nStyle: noir");
        assert!(refined.contains("Rendered in a noir style"));
        assert!(!refined.contains("Style:"));
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let refined = refine_locally("harbor at dawn\nSTYLE: pastel\naspect: 9:16");
        assert!(refined.contains("Rendered in a pastel style"));
        assert!(refined.contains("framed for 9:16 aspect ratio"));
        assert!(!refined.contains("STYLE"));
    }

    #[test]
    fn test_without_hints() {
        let refined = refine_locally("A cat on a windowsill.");
        assert_eq!(
            refined,
            "A cat on a windowsill. with cinematic lighting, shallow depth of field, and fluid \
             camera movement. conveying a moody, immersive atmosphere."
        );
    }

    #[test]
    fn test_multiline_core_is_joined() {
        let refined = refine_locally("  a quiet forest  \n\n   morning fog\n");
        assert!(refined.starts_with("a quiet forest morning fog. with cinematic lighting"));
    }

    #[test]
    fn test_long_input_is_capped() {
        let long = vec!["word"; 150].join(" ");
        let refined = refine_locally(&long);

        assert_eq!(refined.split_whitespace().count(), MAX_REFINED_WORDS);
        assert!(refined.ends_with("word."));
        assert!(!refined.ends_with(".."));
    }

    #[test]
    fn test_cap_does_not_double_period() {
        let long = vec!["end."; 120].join(" ");
        let refined = refine_locally(&long);

        assert!(refined.split_whitespace().count() <= MAX_REFINED_WORDS);
        assert!(refined.ends_with("end."));
        assert!(!refined.ends_with(".."));
    }

    #[test]
    fn test_output_always_ends_with_single_period() {
        for input in ["", "   ", "sunset", "sunset...", "Style: noir", "a\nAspect: 1:1"] {
            let refined = refine_locally(input);
            assert!(refined.ends_with('.'), "{:?} -> {:?}", input, refined);
            assert!(!refined.ends_with(".."), "{:?} -> {:?}", input, refined);
            assert!(refined.split_whitespace().count() <= MAX_REFINED_WORDS);
        }
    }

    #[test]
    fn test_fallback_refine_matches_local() {
        let input = "sunset\nStyle: noir";
        assert_eq!(fallback_refine(input), refine_locally(input));
    }
}
