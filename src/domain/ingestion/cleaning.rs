//! Removal of running headers and page numbers from extracted text

/// Running-header markers. A line containing one is dropped unless it also has a keep marker.
const BOILERPLATE_MARKERS: &[&str] = &[
    "CHAPTER",
    "PHYSICS",
    "MECHANICAL PROPERTIES",
    "REPRINT",
    "SUMMARY",
    "POINTS TO PONDER",
    "EXERCISES",
    "==START OF OCR",
    "==END OF OCR",
];

/// Section titles that look like headers but carry content
const KEEP_MARKERS: &[&str] = &[
    "INTRODUCTION",
    "STRESS",
    "HOOK",
    "CURVE",
    "MODULI",
    "APPLICATIONS",
    "POISSON",
    "8.1",
    "8.2",
    "8.3",
    "8.4",
    "8.5",
    "8.6",
];

fn is_page_number(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
}

fn is_running_header(line: &str) -> bool {
    let upper = line.to_uppercase();
    BOILERPLATE_MARKERS.iter().any(|m| upper.contains(m))
        && !KEEP_MARKERS.iter().any(|m| upper.contains(m))
}

/// Drop digit-only lines and running headers, keeping everything else verbatim
pub fn clean_text(text: &str) -> String {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !is_page_number(trimmed) && !is_running_header(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_page_numbers() {
        assert_eq!(
            clean_text("Stress is force.\n  213 \nStrain is ratio."),
            "Stress is force.\nStrain is ratio."
        );
    }

    #[test]
    fn test_drops_running_headers() {
        let text = "PHYSICS\nChapter Eight\nElastic bodies regain shape.\nReprint 2024-25";
        assert_eq!(clean_text(text), "Elastic bodies regain shape.");
    }

    #[test]
    fn test_keeps_section_titles() {
        let text = "CHAPTER 8.1 INTRODUCTION\nMECHANICAL PROPERTIES OF SOLIDS\n8.4 Hooke's law";
        assert_eq!(clean_text(text), "CHAPTER 8.1 INTRODUCTION\n8.4 Hooke's law");
    }

    #[test]
    fn test_keeps_blank_lines() {
        assert_eq!(clean_text("a\n\nb"), "a\n\nb");
    }
}
