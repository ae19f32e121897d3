use std::io::{Cursor, Write};

use failure::Error;

use flate2::write::GzEncoder;
use flate2::Compression;

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::project::clip::AudioSource;

use super::{PROJECT_FILE_EXTENSION, PROJECT_INFO_DIR, SAMPLES_DIR};

/// Packages the live set document and its audio assets into a project
/// archive:
///
/// ```text
/// <name>/
///   Ableton Project Info/
///   Samples/Imported/<asset name>
///   <name>.als
/// ```
///
/// The document is gzipped into the `.als` entry and stored as-is; the
/// surrounding zip does not compress it again.
pub fn package(
  name: &str,
  document: &str,
  assets: &[(String, AudioSource)],
) -> Result<Vec<u8>, Error> {
  let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

  writer.add_directory(format!("{}/{}", name, PROJECT_INFO_DIR), FileOptions::default())?;

  for (asset_name, audio) in assets {
    writer.start_file(
      format!("{}/{}/{}", name, SAMPLES_DIR, asset_name),
      FileOptions::default(),
    )?;
    writer.write_all(audio)?;
  }

  let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
  encoder.write_all(document.as_bytes())?;
  let compressed = encoder.finish()?;

  writer.start_file(
    format!("{}/{}.{}", name, name, PROJECT_FILE_EXTENSION),
    FileOptions::default().compression_method(CompressionMethod::Stored),
  )?;
  writer.write_all(&compressed)?;

  let cursor = writer.finish()?;
  Ok(cursor.into_inner())
}

#[cfg(test)]
mod test {

  use std::io::{Cursor, Read};
  use std::rc::Rc;

  use flate2::read::GzDecoder;
  use zip::ZipArchive;

  use super::package;

  fn read_archive(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(bytes)).unwrap()
  }

  #[test]
  pub fn layout() {
    let assets = vec![("kick.wav".to_string(), Rc::new(vec![1u8, 2, 3]))];
    let bytes = package("Project-1", "<LiveSet />", &assets).unwrap();

    let mut archive = read_archive(bytes);
    let names: Vec<String> = (0..archive.len())
      .map(|i| archive.by_index(i).unwrap().name().to_string())
      .collect();

    assert!(names.contains(&"Project-1/Ableton Project Info/".to_string()));
    assert!(names.contains(&"Project-1/Samples/Imported/kick.wav".to_string()));
    assert!(names.contains(&"Project-1/Project-1.als".to_string()));
    assert_eq!(names.len(), 3);
  }

  #[test]
  pub fn assets_are_byte_identical() {
    let audio = vec![0u8, 255, 42, 1];
    let assets = vec![("kick.wav".to_string(), Rc::new(audio.clone()))];
    let bytes = package("Project-1", "<LiveSet />", &assets).unwrap();

    let mut archive = read_archive(bytes);
    let mut entry = archive.by_name("Project-1/Samples/Imported/kick.wav").unwrap();
    let mut packaged = Vec::new();
    entry.read_to_end(&mut packaged).unwrap();
    assert_eq!(packaged, audio);
  }

  #[test]
  pub fn project_file_is_gzipped_document() {
    let bytes = package("Project-1", "<LiveSet />", &[]).unwrap();

    let mut archive = read_archive(bytes);
    let mut entry = archive.by_name("Project-1/Project-1.als").unwrap();
    assert_eq!(entry.compression(), zip::CompressionMethod::Stored);
    let mut compressed = Vec::new();
    entry.read_to_end(&mut compressed).unwrap();

    let mut document = String::new();
    GzDecoder::new(&compressed[..]).read_to_string(&mut document).unwrap();
    assert_eq!(document, "<LiveSet />");
  }
}
