use std::{fs, io::Write, path::Path};

use tempfile::NamedTempFile;

use crate::{Result, frame::Frame};

pub fn to_csv(frame: &Frame) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(frame.columns())?;
    for row in frame.rows() {
        wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or_default()))?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

/// Writes the whole file in one go, creating missing parent directories.
pub fn write_csv(path: &Path, frame: &Frame) -> Result<()> {
    write_all(&[path], frame)
}

/// Stages a copy next to every destination and only moves them into place
/// once all of them are written. A failed stage leaves no file behind.
pub fn write_all<P: AsRef<Path>>(paths: &[P], frame: &Frame) -> Result<()> {
    let contents = to_csv(frame)?;

    let staged = paths
        .iter()
        .map(|path| stage(path.as_ref(), &contents))
        .collect::<Result<Vec<_>>>()?;

    for (file, path) in staged.into_iter().zip(paths) {
        let path = path.as_ref();
        file.persist(path).map_err(|e| e.error)?;
        tracing::info!(target: "output", "wrote {} rows to {}", frame.len(), path.display());
    }
    Ok(())
}

fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Listing, MergedRecord, PartialRecord};

    fn frame() -> Frame {
        let records = [
            MergedRecord {
                record: PartialRecord {
                    id: 1,
                    listing: Listing {
                        jogo: "Game A".into(),
                        desconto: "-50%".into(),
                        preco: "R$ 9,99".into(),
                        avaliacao: "9/10".into(),
                        liberar: "Jun 1".into(),
                        termina: "Ends: 2024-06-03 00:00 UTC".into(),
                        iniciado: "N/A".into(),
                    },
                },
                datas: Some("Ends: 2024-06-03 00:00 UTC".into()),
            },
            MergedRecord {
                record: PartialRecord {
                    id: 3,
                    listing: Listing {
                        jogo: "Game \"B\"".into(),
                        ..Listing::default()
                    },
                },
                datas: None,
            },
        ];
        Frame::from_records(&records).rename().dedup_columns()
    }

    #[test]
    fn serializes_header_and_rows() {
        let csv = String::from_utf8(to_csv(&frame()).unwrap()).unwrap();

        assert_eq!(
            csv,
            "ID,Jogo,Desconto,Preço,Avaliação,Liberar,Termina,Datas\n\
             1,-50%,\"R$ 9,99\",9/10,Jun 1,Ends: 2024-06-03 00:00 UTC,N/A,Ends: 2024-06-03 00:00 UTC\n\
             3,,,,,,,\n"
        );
    }

    #[test]
    fn writes_into_missing_directories() {
        let dir = std::env::temp_dir().join(format!("sdb-output-{}", std::process::id()));
        let path = dir.join("nested").join("sales.csv");

        write_csv(&path, &frame()).unwrap();

        assert_eq!(fs::read(&path).unwrap(), to_csv(&frame()).unwrap());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn failed_destination_leaves_no_files() {
        let dir = std::env::temp_dir().join(format!("sdb-output-all-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("blocker");
        fs::write(&blocker, b"").unwrap();
        let paths = [dir.join("sales.csv"), blocker.join("copy.csv")];

        assert!(write_all(&paths, &frame()).is_err());

        assert!(!paths[0].exists());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn every_destination_gets_the_same_bytes() {
        let dir = std::env::temp_dir().join(format!("sdb-output-copies-{}", std::process::id()));
        let paths = [dir.join("completo.csv"), dir.join("divididos.csv")];

        write_all(&paths, &frame()).unwrap();

        for path in &paths {
            assert_eq!(fs::read(path).unwrap(), to_csv(&frame()).unwrap());
        }
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 2);
        fs::remove_dir_all(dir).unwrap();
    }
}
