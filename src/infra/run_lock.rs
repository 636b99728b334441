use anyhow::{Context, Result, bail};
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

pub const LOCK_FILE_NAME: &str = ".datainit.lock";

/// Exclusive `flock` on `<root>/.datainit.lock` held for one bootstrap run.
///
/// The kernel drops the lock when the file is closed, including when the
/// process is killed, so a leftover lock file never blocks a later run.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    _file: File,
}

impl RunLock {
    pub fn acquire(root: &Path) -> Result<Self> {
        let path = root.join(LOCK_FILE_NAME);

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("abrindo {:?}", path))?;

        // SAFETY: the fd stays valid for the lifetime of `file`
        let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        if rc != 0 {
            let err = io::Error::last_os_error();
            if err.kind() == ErrorKind::WouldBlock {
                let holder = fs::read_to_string(&path).unwrap_or_default();
                bail!(
                    "Outra execução (pid {}) já está em andamento em {:?}",
                    holder.trim(),
                    root
                );
            }
            return Err(anyhow::Error::new(err).context(format!("travando {:?}", path)));
        }

        file.set_len(0)
            .with_context(|| format!("truncando {:?}", path))?;
        writeln!(file, "{}", std::process::id()).with_context(|| format!("escrevendo {:?}", path))?;

        Ok(Self { path, _file: file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
