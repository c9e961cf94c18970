use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};

use crate::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Strips the synthetic top-level directory that GitHub prepends to every
/// archive entry (`{owner}-{name}-{sha}/...`).
///
/// Returns `None` for an entry that is exactly the synthetic root: after
/// dropping the first component nothing remains, and nothing may be written
/// at the target directory's own path.
fn strip_archive_root(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    components.next()?;
    let rest = components.as_path();
    if rest.as_os_str().is_empty() {
        None
    } else {
        Some(rest.to_path_buf())
    }
}

/// Streams a gzip-compressed tar archive into `target_dir`.
///
/// Directory entries are created idempotently, regular files are written
/// with their full payload, and pax global headers are ignored. Any other
/// entry type aborts the extraction; entries already written stay on disk.
pub fn unpack<R: Read>(mut stream: R, target_dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(target_dir).map_err(Error::Unpack)?;

    let mut magic = [0u8; 2];
    stream
        .read_exact(&mut magic)
        .map_err(|e| Error::Decompress(e.to_string()))?;
    if magic != GZIP_MAGIC {
        return Err(Error::Decompress(String::from("not a gzip stream")));
    }
    let decoder = GzDecoder::new((&magic[..]).chain(stream));

    let mut archive = Archive::new(decoder);
    for entry in archive.entries().map_err(Error::Unpack)? {
        let mut entry = entry.map_err(Error::Unpack)?;
        let name = entry.path().map_err(Error::Unpack)?.into_owned();
        match entry.header().entry_type() {
            EntryType::Directory => {
                if let Some(rel) = strip_archive_root(&name) {
                    fs::create_dir_all(target_dir.join(rel)).map_err(Error::Unpack)?;
                }
            }
            EntryType::Regular => {
                let rel = match strip_archive_root(&name) {
                    Some(rel) => rel,
                    None => continue,
                };
                let dest = target_dir.join(rel);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent).map_err(Error::Unpack)?;
                }
                let mut out = File::create(&dest).map_err(Error::Unpack)?;
                io::copy(&mut entry, &mut out).map_err(Error::Unpack)?;
            }
            EntryType::XGlobalHeader => {
                // pax marker injected by git archive generators, not a file
            }
            other => {
                return Err(Error::UnsupportedEntry {
                    name: name.display().to_string(),
                    kind: other,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tar::{Builder, Header};

    fn header(entry_type: EntryType, size: u64) -> Header {
        let mut header = Header::new_gnu();
        header.set_entry_type(entry_type);
        header.set_size(size);
        header.set_mode(0o644);
        header.set_cksum();
        header
    }

    fn gzipped_archive(build: impl FnOnce(&mut Builder<&mut Vec<u8>>)) -> Vec<u8> {
        let mut tarball = Vec::new();
        let mut builder = Builder::new(&mut tarball);
        build(&mut builder);
        builder.finish().unwrap();
        drop(builder);
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        io::copy(&mut tarball.as_slice(), &mut encoder).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn strip_archive_root_drops_first_segment() {
        assert_eq!(
            strip_archive_root(Path::new("root-sha/file.txt")),
            Some(PathBuf::from("file.txt"))
        );
        assert_eq!(
            strip_archive_root(Path::new("root-sha/a/b.txt")),
            Some(PathBuf::from("a/b.txt"))
        );
    }

    #[test]
    fn strip_archive_root_skips_bare_root() {
        assert_eq!(strip_archive_root(Path::new("root-sha/")), None);
        assert_eq!(strip_archive_root(Path::new("root-sha")), None);
        assert_eq!(strip_archive_root(Path::new("")), None);
    }

    #[test]
    fn unpack_strips_synthetic_root() {
        let archive = gzipped_archive(|builder| {
            let mut dir = header(EntryType::Directory, 0);
            builder.append_data(&mut dir, "root-sha/", io::empty()).unwrap();
            let mut global = header(EntryType::XGlobalHeader, 0);
            builder
                .append_data(&mut global, "pax_global_header", io::empty())
                .unwrap();
            let mut file = header(EntryType::Regular, 5);
            builder
                .append_data(&mut file, "root-sha/file.txt", &b"hello"[..])
                .unwrap();
        });

        let work = tempfile::tempdir().unwrap();
        let target = work.path().join("proj");
        unpack(archive.as_slice(), &target).unwrap();

        assert_eq!(fs::read_to_string(target.join("file.txt")).unwrap(), "hello");
        assert!(!target.join("root-sha").exists());
        let entries: Vec<_> = fs::read_dir(&target)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, ["file.txt"]);
    }

    #[test]
    fn unpack_creates_nested_directories() {
        let archive = gzipped_archive(|builder| {
            let mut dir = header(EntryType::Directory, 0);
            builder
                .append_data(&mut dir, "root-sha/a/b/", io::empty())
                .unwrap();
            let mut file = header(EntryType::Regular, 2);
            builder
                .append_data(&mut file, "root-sha/a/b/c.txt", &b"ok"[..])
                .unwrap();
        });

        let work = tempfile::tempdir().unwrap();
        let target = work.path().join("proj");
        unpack(archive.as_slice(), &target).unwrap();
        assert_eq!(fs::read_to_string(target.join("a/b/c.txt")).unwrap(), "ok");
    }

    #[test]
    fn unpack_overwrites_colliding_file() {
        let work = tempfile::tempdir().unwrap();
        let target = work.path().join("proj");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("file.txt"), "old").unwrap();

        let archive = gzipped_archive(|builder| {
            let mut file = header(EntryType::Regular, 3);
            builder
                .append_data(&mut file, "root-sha/file.txt", &b"new"[..])
                .unwrap();
        });
        unpack(archive.as_slice(), &target).unwrap();
        assert_eq!(fs::read_to_string(target.join("file.txt")).unwrap(), "new");
    }

    #[test]
    fn unpack_rejects_unsupported_entry_type() {
        let archive = gzipped_archive(|builder| {
            let mut file = header(EntryType::Regular, 5);
            builder
                .append_data(&mut file, "root-sha/kept.txt", &b"kept!"[..])
                .unwrap();
            let mut link = header(EntryType::Symlink, 0);
            link.set_link_name("kept.txt").unwrap();
            builder
                .append_data(&mut link, "root-sha/link", io::empty())
                .unwrap();
        });

        let work = tempfile::tempdir().unwrap();
        let target = work.path().join("proj");
        let err = unpack(archive.as_slice(), &target).unwrap_err();
        match err {
            Error::UnsupportedEntry { name, kind } => {
                assert_eq!(name, "root-sha/link");
                assert_eq!(kind, EntryType::Symlink);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Entries processed before the failing one stay on disk.
        assert_eq!(fs::read_to_string(target.join("kept.txt")).unwrap(), "kept!");
    }

    #[test]
    fn unpack_rejects_non_gzip_stream() {
        let work = tempfile::tempdir().unwrap();
        let target = work.path().join("proj");
        let err = unpack(&b"plain text, not gzip"[..], &target).unwrap_err();
        assert!(matches!(err, Error::Decompress(_)));
    }

    #[test]
    fn unpack_rejects_truncated_stream() {
        let work = tempfile::tempdir().unwrap();
        let target = work.path().join("proj");
        let err = unpack(&GZIP_MAGIC[..], &target).unwrap_err();
        assert!(matches!(err, Error::Unpack(_)));
    }
}
