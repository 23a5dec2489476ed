/* std use */
use std::io::Write;

/* project use */
use crate::error;

/// File written in the directory of its target and renamed on [AtomicFile::commit].
///
/// If it's dropped before commit the temporary file is removed.
pub struct AtomicFile {
    target: std::path::PathBuf,
    output: std::io::BufWriter<tempfile::NamedTempFile>,
}

impl AtomicFile {
    /// Create temporary file next to target
    pub fn create<P>(target: P) -> error::Result<Self>
    where
        P: AsRef<std::path::Path>,
    {
        let target = target.as_ref().to_path_buf();

        let directory = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::path::PathBuf::from("."),
        };

        let temporary = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(directory)
            .map_err(|source| error::Error::WriteFile {
                path: target.clone(),
                source,
            })?;

        Ok(Self {
            target,
            output: std::io::BufWriter::new(temporary),
        })
    }

    pub fn target(&self) -> &std::path::Path {
        &self.target
    }

    /// Run writer on the temporary file, io error are reported against target
    pub fn write_with<F>(&mut self, writer: F) -> error::Result<()>
    where
        F: FnOnce(&mut std::io::BufWriter<tempfile::NamedTempFile>) -> std::io::Result<()>,
    {
        writer(&mut self.output).map_err(|source| self.write_error(source))
    }

    /// Build the error reported when writing failed
    pub fn write_error(&self, source: std::io::Error) -> error::Error {
        error::Error::WriteFile {
            path: self.target.clone(),
            source,
        }
    }

    /// Flush content and rename temporary file to target
    pub fn commit(mut self) -> error::Result<std::path::PathBuf> {
        self.output
            .flush()
            .map_err(|source| self.write_error(source))?;

        let target = self.target;
        let temporary = self
            .output
            .into_inner()
            .map_err(|e| error::Error::WriteFile {
                path: target.clone(),
                source: e.into_error(),
            })?;

        temporary
            .as_file()
            .sync_all()
            .map_err(|source| error::Error::WriteFile {
                path: target.clone(),
                source,
            })?;

        temporary
            .persist(&target)
            .map_err(|e| error::Error::PersistFile {
                path: target.clone(),
                source: e.error,
            })?;

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        let mut file = AtomicFile::create(&target).unwrap();
        file.write_with(|out| out.write_all(b"ACGT\n")).unwrap();

        assert!(!target.exists());

        assert_eq!(file.commit().unwrap(), target);
        assert_eq!(std::fs::read(&target).unwrap(), b"ACGT\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn drop_without_commit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        {
            let mut file = AtomicFile::create(&target).unwrap();
            file.write_with(|out| out.write_all(b"partial")).unwrap();
        }

        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn replace_existing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        std::fs::write(&target, b"old").unwrap();

        let mut file = AtomicFile::create(&target).unwrap();
        file.write_with(|out| out.write_all(b"new")).unwrap();
        file.commit().unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"new");
    }
}
