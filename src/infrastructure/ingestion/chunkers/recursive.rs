//! Recursive chunking strategy

use std::collections::VecDeque;

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ingestion::{Chunk, ChunkingConfig, ChunkingStrategy};
use crate::domain::DomainError;

/// Chunking strategy that recursively splits text hierarchically
///
/// Splitting order: paragraphs -> lines -> sentences -> words -> characters.
/// Pieces are merged back up to `chunk_size` characters, and each chunk
/// starts with up to `chunk_overlap` characters taken from the end of the
/// previous one.
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunker;

#[derive(Debug, Clone, Copy)]
enum Level {
    Paragraph,
    Line,
    Sentence,
    Word,
}

impl Level {
    fn separator(self) -> &'static str {
        match self {
            Self::Paragraph => "\n\n",
            Self::Line => "\n",
            Self::Sentence | Self::Word => " ",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::Paragraph => Some(Self::Line),
            Self::Line => Some(Self::Sentence),
            Self::Sentence => Some(Self::Word),
            Self::Word => None,
        }
    }

    fn split(self, text: &str) -> Vec<&str> {
        let parts: Box<dyn Iterator<Item = &str>> = match self {
            Self::Paragraph => Box::new(text.split("\n\n")),
            Self::Line => Box::new(text.lines()),
            Self::Sentence => Box::new(text.unicode_sentences()),
            Self::Word => Box::new(text.split_whitespace()),
        };

        parts.map(str::trim).filter(|p| !p.is_empty()).collect()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

impl RecursiveChunker {
    pub fn new() -> Self {
        Self
    }

    fn split_text(text: &str, level: Level, config: &ChunkingConfig) -> Vec<String> {
        let separator = level.separator();
        let mut result = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();

        for part in level.split(text) {
            if char_len(part) <= config.chunk_size {
                fitting.push(part);
                continue;
            }

            if !fitting.is_empty() {
                result.extend(Self::merge(&fitting, separator, config));
                fitting.clear();
            }

            match level.next() {
                Some(next) => result.extend(Self::split_text(part, next, config)),
                None => result.extend(Self::split_chars(part, config)),
            }
        }

        if !fitting.is_empty() {
            result.extend(Self::merge(&fitting, separator, config));
        }

        result
    }

    /// Greedily pack pieces into chunks, carrying an overlap tail forward
    fn merge(pieces: &[&str], separator: &str, config: &ChunkingConfig) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            let joined_len = |total: usize, window: &VecDeque<&str>| {
                total + len + if window.is_empty() { 0 } else { sep_len }
            };

            if joined_len(total, &window) > config.chunk_size && !window.is_empty() {
                chunks.push(window.iter().copied().collect::<Vec<_>>().join(separator));

                while total > config.chunk_overlap
                    || (!window.is_empty() && joined_len(total, &window) > config.chunk_size)
                {
                    let Some(front) = window.pop_front() else {
                        break;
                    };
                    total -= char_len(front) + if window.is_empty() { 0 } else { sep_len };
                }
            }

            total = joined_len(total, &window);
            window.push_back(piece);
        }

        if !window.is_empty() {
            chunks.push(window.iter().copied().collect::<Vec<_>>().join(separator));
        }

        chunks
    }

    /// Last resort for runs of text without whitespace
    fn split_chars(text: &str, config: &ChunkingConfig) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = config.chunk_size - config.chunk_overlap;
        let mut result = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + config.chunk_size).min(chars.len());
            result.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        result
    }
}

impl ChunkingStrategy for RecursiveChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let content = content.trim();

        if content.is_empty() {
            return Ok(vec![]);
        }

        Ok(Self::split_text(content, Level::Paragraph, config)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(text, i))
            .collect())
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_content() {
        let chunker = RecursiveChunker::new();
        let config = ChunkingConfig::default();

        assert!(chunker.chunk("", &config).unwrap().is_empty());
        assert!(chunker.chunk("  \n\n ", &config).unwrap().is_empty());
    }

    #[test]
    fn test_small_content() {
        let chunker = RecursiveChunker::new();
        let config = ChunkingConfig::new(1000, 0);

        let chunks = chunker.chunk("Small content", &config).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Small content");
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_split_by_paragraphs() {
        let chunker = RecursiveChunker::new();
        let config = ChunkingConfig::new(30, 0);

        let content = "First paragraph here.\n\nSecond paragraph here.\n\nThird paragraph here.";
        let chunks = chunker.chunk(content, &config).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].content, "Second paragraph here.");
    }

    #[test]
    fn test_split_by_sentences() {
        let chunker = RecursiveChunker::new();
        let config = ChunkingConfig::new(25, 0);

        let content = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = chunker.chunk(content, &config).unwrap();

        assert_eq!(
            chunks.iter().map(|c| c.content.as_str()).collect::<Vec<_>>(),
            vec!["First sentence here.", "Second sentence here.", "Third sentence here."]
        );
    }

    #[test]
    fn test_chunks_respect_size_and_indices() {
        let chunker = RecursiveChunker::new();
        let config = ChunkingConfig::new(50, 10);

        let content = format!("{}\n\n{}\n{}", words(40), words(15), "x".repeat(120));
        let chunks = chunker.chunk(&content, &config).unwrap();

        assert!(chunks.len() > 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert!(chunk.char_len() <= 50, "{:?}", chunk.content);
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let chunker = RecursiveChunker::new();
        let config = ChunkingConfig::new(50, 10);

        let chunks = chunker.chunk(&words(100), &config).unwrap();

        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            let first_word = pair[1].content.split(' ').next().unwrap();
            let tail: Vec<&str> = pair[0].content.rsplit(' ').take(4).collect();
            assert!(tail.contains(&first_word), "{:?}", pair);
        }
    }

    #[test]
    fn test_no_overlap_when_disabled() {
        let chunker = RecursiveChunker::new();
        let config = ChunkingConfig::new(50, 0);

        let chunks = chunker.chunk(&words(100), &config).unwrap();
        let rejoined = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        assert_eq!(rejoined, words(100));
    }

    #[test]
    fn test_unbroken_text_falls_back_to_characters() {
        let chunker = RecursiveChunker::new();
        let config = ChunkingConfig::new(40, 10);

        let chunks = chunker.chunk(&"é".repeat(100), &config).unwrap();

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.char_len() <= 40));
        assert_eq!(chunks[2].char_len(), 40);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let chunker = RecursiveChunker::new();
        assert!(chunker.chunk("text", &ChunkingConfig::new(10, 10)).is_err());
    }

    #[test]
    fn test_name() {
        assert_eq!(RecursiveChunker::new().name(), "recursive");
    }
}
