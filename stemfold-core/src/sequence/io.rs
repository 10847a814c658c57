use std::fs::{self, File};
use std::path::Path;

use bio::io::fasta;

use crate::types::*;

/// Header, optional description and raw sequence bytes of one input record.
pub type SequenceRecord = (String, Option<String>, Vec<u8>);

/// Concatenate the sequence part of labeled text.
///
/// The first whitespace-delimited token of each line (a record label or
/// index) is dropped and the remaining tokens are joined without
/// whitespace. Case is preserved; validation happens during encoding.
#[must_use]
pub fn parse_labeled_text(text: &str) -> String {
    text.lines()
        .flat_map(|line| line.split_whitespace().skip(1))
        .collect()
}

/// Read a labeled-text sequence file.
///
/// The record header is the file stem, since the format carries no name.
pub fn read_labeled_sequence<P: AsRef<Path>>(path: P) -> Result<SequenceRecord, FoldError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let header = path
        .file_stem()
        .map_or_else(|| "sequence".to_string(), |s| s.to_string_lossy().into_owned());

    Ok((header, None, parse_labeled_text(&text).into_bytes()))
}

/// Read the first record of a FASTA file using rust-bio
pub fn read_fasta_sequence<P: AsRef<Path>>(path: P) -> Result<SequenceRecord, FoldError> {
    let file = File::open(path)?;
    let reader = fasta::Reader::new(file);

    let record = reader
        .records()
        .next()
        .ok_or_else(|| FoldError::MalformedInput("FASTA file contains no records".to_string()))?
        .map_err(|e| FoldError::ParseError(e.to_string()))?;

    Ok((
        record.id().to_string(),
        record.desc().map(String::from),
        record.seq().to_vec(),
    ))
}
