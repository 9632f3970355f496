use crate::error::{P4CleanError, Result};
use crate::perforce::{P4Output, P4Runner};
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Create `rel` (and its parent directories) under `root` with some content.
pub(crate) fn write_file(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, format!("contents of {}\n", rel)).unwrap();
    path
}

/// In-memory writer whose contents stay readable after it is boxed.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Canned p4: each response is chosen by the first prefix that matches the
/// space-joined arguments. Unmatched invocations fail like an unreachable
/// server.
#[derive(Default)]
pub(crate) struct FakeP4 {
    responses: Vec<(String, String)>,
    calls: RefCell<Vec<String>>,
}

impl FakeP4 {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, prefix: &str, stdout: &str) -> Self {
        self.responses.push((prefix.to_string(), stdout.to_string()));
        self
    }

    pub(crate) fn was_called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }
}

impl P4Runner for FakeP4 {
    fn run(&self, _cwd: &Path, args: &[&str]) -> Result<P4Output> {
        let joined = args.join(" ");
        self.calls.borrow_mut().push(joined.clone());
        self.responses
            .iter()
            .find(|(prefix, _)| joined.starts_with(prefix.as_str()))
            .map(|(_, stdout)| P4Output {
                stdout: stdout.clone(),
                stderr: String::new(),
            })
            .ok_or_else(|| {
                P4CleanError::Unavailable(format!(
                    "p4 {} failed: Connect to server failed; check $P4PORT.",
                    joined
                ))
            })
    }
}
