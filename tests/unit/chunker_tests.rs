/*!
 * Tests for text chunking
 */

use khaya::translation::chunker::{ChunkerConfig, TextChunker, count_words, create_chunks};
use khaya::translation::Chunk;

use crate::common;

/// Concatenating chunk contents must give back every input word in order
#[test]
fn test_createChunks_withLongText_shouldPreserveEveryWordInOrder() {
    let text = common::sample_text().repeat(20);
    let chunks: Vec<Chunk> = create_chunks(&text, 17, 5).collect();

    let rejoined: Vec<&str> = chunks.iter().flat_map(|c| c.content.split_whitespace()).collect();
    let original: Vec<&str> = text.split_whitespace().collect();

    assert_eq!(rejoined, original);
}

#[test]
fn test_createChunks_withLongText_shouldRespectWordLimitAndDenseIndices() {
    let text = common::sample_text().repeat(10);
    let chunks: Vec<Chunk> = create_chunks(&text, 12, 4).collect();

    assert!(chunks.len() > 1);
    for (position, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, position);
        assert!(chunk.word_count >= 1 && chunk.word_count <= 12);
        assert_eq!(chunk.word_count, count_words(&chunk.content));
    }
}

#[test]
fn test_createChunks_calledTwice_shouldBeDeterministic() {
    let text = common::sample_text();
    let first: Vec<Chunk> = create_chunks(text, 9, 3).collect();
    let second: Vec<Chunk> = create_chunks(text, 9, 3).collect();

    assert_eq!(first, second);
}

#[test]
fn test_createChunks_withShortText_shouldReturnSingleChunk() {
    let chunks: Vec<Chunk> = create_chunks(common::sample_text(), 1000, 50).collect();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].word_count, count_words(common::sample_text()));
}

#[test]
fn test_createChunks_shouldCarryNeighbourContext() {
    let chunks: Vec<Chunk> = create_chunks(&common::numbered_sentences(3), 2, 1).collect();

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1].content, "Part 1.");
    assert_eq!(chunks[1].context_prefix, "0.");
    assert_eq!(chunks[1].context_suffix, "Part");
    assert!(chunks[0].context_prefix.is_empty());
    assert!(chunks[2].context_suffix.is_empty());
}

#[test]
fn test_textChunker_withCustomTerminators_shouldSplitOnThem() {
    let chunker = TextChunker::new(ChunkerConfig::new(4).with_context_window(0).with_terminators(&[';']));
    let chunks: Vec<Chunk> = chunker.create_chunks("alpha beta; gamma delta epsilon").collect();

    assert_eq!(chunks[0].content, "alpha beta;");
    assert!(chunks[0].ends_at_sentence_boundary);
    assert_eq!(chunks[1].content, "gamma delta epsilon");
}

#[test]
fn test_chunks_totalWords_shouldCountWholeInput() {
    let chunks = create_chunks("one two three", 2, 0);
    assert_eq!(chunks.total_words(), 3);
    assert_eq!(chunks.count(), 2);
}
