//! Human-readable report output.

use std::path::Path;

use pngscope::png::{ChunkSummary, ChunkType, Ihdr, StopReason, TextChunk, TextValue};
use pngscope::strings::Survey;
use pngscope::{BatchReport, DecodeOutcome, FileReport, ImageDataReport, TrailingReport};

/// Print everything known about one file.
pub fn print_file_report(report: &FileReport) {
    match report.file_size {
        Some(size) => println!("== {} ({} bytes)", report.path.display(), size),
        None => println!("== {}", report.path.display()),
    }

    if let Some(error) = &report.walk_error {
        println!("  walk: {}", error);
    }
    if let Some(ihdr) = &report.ihdr {
        println!("  {}", describe_ihdr(ihdr));
    }
    if let Some(error) = &report.ihdr_error {
        println!("  IHDR: {}", error);
    }

    if !report.chunks.is_empty() {
        print_chunk_table(&report.chunks);
    }
    print_texts(&report.texts);

    if let Some(stop) = &report.stop {
        println!("  stop: {}", describe_stop(stop));
    }
    if let Some(image_data) = &report.image_data {
        println!("  image data: {}", describe_image_data(image_data));
    }
    if let Some(survey) = &report.strings {
        print_survey(survey);
    }
    print_trailing(&report.path, &report.trailing);
    println!();
}

/// Print the chunk listing of one file.
pub fn print_chunk_listing(
    path: &Path,
    chunks: &[ChunkSummary],
    ihdr: Option<&Ihdr>,
    texts: &[TextChunk],
    stop: &StopReason,
) {
    println!("== {}", path.display());
    if let Some(ihdr) = ihdr {
        println!("  {}", describe_ihdr(ihdr));
    }
    print_chunk_table(chunks);
    print_texts(texts);
    println!("  stop: {}", describe_stop(stop));
    println!();
}

/// Print a string survey under a file heading.
pub fn print_strings(path: &Path, survey: &Survey) {
    println!("== {}", path.display());
    print_survey(survey);
    println!();
}

/// Print the trailing-data result for one file.
pub fn print_trailing(path: &Path, trailing: &TrailingReport) {
    match trailing {
        TrailingReport::Skipped => {}
        TrailingReport::Found {
            terminator_offset,
            len: 0,
            suspicious,
            ..
        } => {
            println!("  trailing: none (IEND at 0x{:08x})", terminator_offset);
            if *suspicious {
                println!("  warning: IEND record appears more than once");
            }
        }
        TrailingReport::Found {
            data_offset,
            len,
            artifact,
            suspicious,
            occurrences,
            ..
        } => {
            println!("  trailing: {} bytes at 0x{:08x}", len, data_offset);
            if let Some(artifact) = artifact {
                println!("  saved: {}", artifact.display());
            }
            if *suspicious {
                println!(
                    "  warning: IEND record appears {} times, split at the first",
                    occurrences
                );
            }
        }
        TrailingReport::Failed { error } => {
            println!("  trailing: {} ({})", error, path.display());
        }
    }
}

/// Print the totals line for a batch.
pub fn print_batch_summary(batch: &BatchReport) {
    println!(
        "{} files, {} with trailing data, {} with errors",
        batch.files.len(),
        batch.trailing_count(),
        batch.failed_count()
    );
}

fn print_chunk_table(chunks: &[ChunkSummary]) {
    println!("  {:>10}  {:>10}  {:<4}  {:<8}  flags", "offset", "length", "type", "crc");
    for chunk in chunks {
        println!(
            "  0x{:08x}  {:>10}  {:<4}  {:08x}  {}",
            chunk.offset,
            chunk.length,
            chunk.chunk_type,
            chunk.declared_crc,
            describe_flags(chunk.chunk_type)
        );
    }
}

fn print_texts(texts: &[TextChunk]) {
    for text in texts {
        let value = match &text.text {
            TextValue::Text(value) => format!("{:?}", value),
            TextValue::Undecodable { reason } => format!("<{}>", reason),
        };
        match &text.language {
            Some(language) if !language.is_empty() => {
                println!("  {} {} [{}] = {}", text.kind.chunk_type(), text.keyword, language, value)
            }
            _ => println!("  {} {} = {}", text.kind.chunk_type(), text.keyword, value),
        }
    }
}

fn print_survey(survey: &Survey) {
    if survey.has_hits() {
        println!("  strings: {} runs, {} keyword hits", survey.total_runs, survey.keyword_hits.len());
        for run in &survey.keyword_hits {
            println!("    0x{:08x}  {}", run.offset, run.text);
        }
    } else {
        println!(
            "  strings: {} runs, first {}",
            survey.total_runs,
            survey.preview.len()
        );
        for run in &survey.preview {
            println!("    0x{:08x}  {}", run.offset, run.text);
        }
    }
}

fn describe_ihdr(ihdr: &Ihdr) -> String {
    format!(
        "IHDR: {}x{}, {}-bit {}, {}",
        ihdr.width,
        ihdr.height,
        ihdr.bit_depth,
        ihdr.color_type_name()
            .map_or_else(|| format!("color type {}", ihdr.color_type), str::to_string),
        if ihdr.is_interlaced() { "interlaced" } else { "non-interlaced" }
    )
}

fn describe_flags(chunk_type: ChunkType) -> String {
    let mut flags = vec![if chunk_type.is_critical() { "critical" } else { "ancillary" }];
    if chunk_type.is_private() {
        flags.push("private");
    }
    if chunk_type.is_reserved_bit_set() {
        flags.push("reserved");
    }
    if chunk_type.is_safe_to_copy() {
        flags.push("safe-to-copy");
    }
    if !chunk_type.is_printable() {
        flags.push("non-printable");
    }
    flags.join(",")
}

fn describe_stop(stop: &StopReason) -> String {
    match stop {
        StopReason::Terminator => "IEND".to_string(),
        StopReason::EndOfStream => "end of file without IEND".to_string(),
        StopReason::Truncated {
            chunk_type,
            offset,
            needed,
            available,
        } => format!(
            "truncated {} chunk at 0x{:08x} ({} bytes declared, {} available)",
            chunk_type.map_or_else(|| "unknown".to_string(), |t| t.to_string()),
            offset,
            needed,
            available
        ),
        StopReason::ReadError { message } => format!("read error: {}", message),
    }
}

fn describe_image_data(image_data: &ImageDataReport) -> String {
    let decode = match &image_data.decode {
        DecodeOutcome::NoPayload => "nothing to decode".to_string(),
        DecodeOutcome::Decoded { decompressed_len } => format!("{} bytes decompressed", decompressed_len),
        DecodeOutcome::Failed { error } => format!("decode failed: {}", error),
    };
    format!(
        "{} IDAT chunks, {} bytes compressed, {}",
        image_data.chunk_count, image_data.compressed_len, decode
    )
}
