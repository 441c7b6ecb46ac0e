#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use ripple_archive::ArchiveFormat;
use walkdir::WalkDir;

/// Build a zip in memory. Names ending in `/` become directory entries.
pub fn zip_bytes(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in members {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// A stored zip with `members` followed by `z_damaged.txt`, whose bytes no
/// longer match its CRC.
pub fn zip_with_damaged_tail(members: &[(&str, &[u8])]) -> Vec<u8> {
    let tail = b"this member is damaged on purpose";
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let stored =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in members {
        writer.start_file(*name, stored).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.start_file("z_damaged.txt", stored).unwrap();
    writer.write_all(tail).unwrap();
    let mut bytes = writer.finish().unwrap().into_inner();

    let at = bytes.windows(tail.len()).position(|w| w == tail).unwrap();
    bytes[at] ^= 0xFF;
    bytes
}

/// Zip the contents of `src` (not `src` itself) into `dest`.
pub fn zip_dir(src: &Path, dest: &Path) {
    let mut writer = zip::ZipWriter::new(std::fs::File::create(dest).unwrap());
    let options = zip::write::SimpleFileOptions::default();

    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.unwrap();
        let name = relative_name(src, entry.path());
        if entry.file_type().is_dir() {
            writer.add_directory(format!("{name}/"), options).unwrap();
        } else {
            writer.start_file(name, options).unwrap();
            writer.write_all(&std::fs::read(entry.path()).unwrap()).unwrap();
        }
    }
    writer.finish().unwrap();
}

/// 7z the contents of `src` into `dest`.
pub fn sevenz_dir(src: &Path, dest: &Path) {
    sevenz_rust::compress_to_path(src, dest).unwrap();
}

pub fn write(path: &Path, content: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap()
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Relative path to content for every file under `root`.
pub fn snapshot_files(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_path_buf();
            (relative, std::fs::read(e.path()).unwrap())
        })
        .collect()
}

/// Relative paths of every directory under `root`.
pub fn snapshot_dirs(root: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

/// Files under `root` that still carry an archive extension.
pub fn archives_under(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .filter(|e| ArchiveFormat::from_path(e.path()).is_supported())
        .map(|e| e.into_path())
        .collect()
}

pub const DEEPEST_LEAF: &[u8] = b"deepest leaf";
pub const SPREADSHEET: &[u8] = &[0x50, 0x4B, 0x00, 0xFF, 0x10, 0x80, 0x7F, 0x00];

/// Stage the `TestFolder` fixture below `work` and return the staging
/// directory, which contains `TestFolder/` with archives nested up to four
/// layers deep, alternating zip and 7z.
pub fn build_test_folder(work: &Path) -> PathBuf {
    let child_266 = zip_bytes(&[
        ("Child 2.6.6/", b""),
        ("Child 2.6.6/Child 2.6.6.1.txt", DEEPEST_LEAF),
    ]);

    let stage_26 = work.join("stage-2.6");
    write(&stage_26.join("Child 2.6/Child 2.6.6.zip"), &child_266);
    write(&stage_26.join("Child 2.6/Child 2.6.1.txt"), b"sibling of a nested zip");
    let child_26 = work.join("Child 2.6.7z");
    sevenz_dir(&stage_26, &child_26);

    let child_2 = zip_bytes(&[
        ("Child 2/", b""),
        ("Child 2/Child 2.6.7z", &std::fs::read(&child_26).unwrap()),
        ("Child 2/Child 2.1.txt", b"level two"),
    ]);

    let child_1 = zip_bytes(&[
        ("Child 1.5/", b""),
        ("Child 1.5/notes.txt", b"child one point five"),
    ]);

    let stage_3 = work.join("stage-3");
    write(&stage_3.join("Child 3/Child 3.3.xlsx"), SPREADSHEET);
    let child_3 = work.join("Child 3.7z");
    sevenz_dir(&stage_3, &child_3);

    let staging = work.join("staging");
    let folder = staging.join("TestFolder");
    write(&folder.join("Child 1.zip"), &child_1);
    write(&folder.join("Child 2.zip"), &child_2);
    write(&folder.join("Child 3.7z"), &std::fs::read(&child_3).unwrap());
    write(&folder.join("Child 4/readme.txt"), b"plain directory");
    write(&folder.join("Child 5.xlsx"), SPREADSHEET);
    staging
}

/// Paths every fully rippled `TestFolder` output must contain.
pub fn expected_paths() -> [&'static str; 5] {
    [
        "TestFolder",
        "TestFolder/Child 5.xlsx",
        "TestFolder/Child 1/Child 1.5",
        "TestFolder/Child 3/Child 3/Child 3.3.xlsx",
        "TestFolder/Child 2/Child 2/Child 2.6/Child 2.6/Child 2.6.6/Child 2.6.6/Child 2.6.6.1.txt",
    ]
}
