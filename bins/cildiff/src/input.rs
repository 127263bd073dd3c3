// SPDX-License-Identifier: Apache-2.0
//! Policy input loading: files or stdin, with bzip2 auto-detection.

use std::fs::File;
use std::io::{self, Read};

use anyhow::{Context, Result};
use bzip2::read::MultiBzDecoder;

const BZ2_MAGIC: &[u8] = b"BZh";

/// A loaded policy input.
#[derive(Debug)]
pub struct PolicyInput {
    /// Display path (`<stdin>` for standard input).
    pub path: String,
    /// Decompressed policy text.
    pub text: String,
}

/// Reads a policy from `path`, or from stdin when `path` is `-`.
///
/// Input starting with the bzip2 magic is decompressed transparently.
pub fn read_policy(path: &str) -> Result<PolicyInput> {
    let (display, bytes) = if path == "-" {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read standard input")?;
        ("<stdin>".to_owned(), bytes)
    } else {
        let mut bytes = Vec::new();
        File::open(path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .with_context(|| format!("cannot read file '{path}'"))?;
        (path.to_owned(), bytes)
    };

    let bytes = if bytes.starts_with(BZ2_MAGIC) {
        let mut decompressed = Vec::new();
        MultiBzDecoder::new(bytes.as_slice())
            .read_to_end(&mut decompressed)
            .with_context(|| format!("failed to decompress '{display}'"))?;
        decompressed
    } else {
        bytes
    };

    let text = String::from_utf8(bytes)
        .map_err(|_| anyhow::anyhow!("input '{display}' is not valid UTF-8"))?;
    Ok(PolicyInput {
        path: display,
        text,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::io::Write;

    #[test]
    fn plain_file_reads_verbatim() {
        let file = tempfile_path("plain.cil");
        std::fs::write(&file, "(type t)\n").unwrap();
        let input = read_policy(file.to_str().unwrap()).unwrap();
        assert_eq!(input.text, "(type t)\n");
    }

    #[test]
    fn bzip2_input_is_detected_and_decompressed() {
        use bzip2::write::BzEncoder;
        use bzip2::Compression;

        let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"(type t)\n").unwrap();
        let compressed = encoder.finish().unwrap();
        assert!(compressed.starts_with(BZ2_MAGIC));

        let file = tempfile_path("compressed.cil");
        std::fs::write(&file, &compressed).unwrap();
        let input = read_policy(file.to_str().unwrap()).unwrap();
        assert_eq!(input.text, "(type t)\n");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_policy("/no/such/file.cil").unwrap_err();
        assert!(err.to_string().contains("/no/such/file.cil"));
    }

    fn tempfile_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("cildiff-test-{}-{name}", std::process::id()));
        path
    }
}
