use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

///
/// Get a reader for either a gzip'd or non-gzip'd file
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> io::Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Return the first candidate file that exists inside `dir`, e.g. to prefer
/// `index.json` and fall back to `index.json.gz`.
///
pub fn find_first_existing(dir: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::{BufRead, Write};

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_reads_plain_and_gzipped_files() {
        let dir = tempdir().unwrap();

        let plain = dir.path().join("index.json");
        std::fs::write(&plain, "{\"regions\": []}\n").unwrap();

        let gz = dir.path().join("index.json.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(b"{\"regions\": []}\n").unwrap();
        encoder.finish().unwrap();

        for path in [plain, gz] {
            let line = get_dynamic_reader(&path).unwrap().lines().next().unwrap().unwrap();
            assert_eq!(line, "{\"regions\": []}");
        }
    }

    #[rstest]
    fn test_find_first_existing() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("index.json.gz"), b"").unwrap();

        let found = find_first_existing(dir.path(), &["index.json", "index.json.gz"]);
        assert_eq!(found, Some(dir.path().join("index.json.gz")));
        assert_eq!(find_first_existing(dir.path(), &["missing.json"]), None);
    }
}
