use std::io::Read;

use camino::Utf8PathBuf;
use remote_exec::resolver::ScriptBody;
use tempfile::TempDir;

/// Content of the `script1.sh` fixture.
#[allow(dead_code)]
pub const SCRIPT1: &str = "cd /tmp\nwget http://foobar\nexit 0\n";

/// Returns the temp directory as a UTF-8 path.
///
/// # Panics
/// Panics if the temp directory path is not valid UTF-8.
#[allow(dead_code)]
pub fn utf8_dir(temp_dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("path should be valid UTF-8")
}

/// Writes a fixture file into the temp directory and returns its path.
#[allow(dead_code)]
pub fn write_fixture(temp_dir: &TempDir, name: &str, content: &str) -> Utf8PathBuf {
    let path = utf8_dir(temp_dir).join(name);
    std::fs::write(&path, content).expect("failed to write fixture");
    path
}

/// Drains a script body into a string.
#[allow(dead_code)]
pub fn drain(body: &mut ScriptBody) -> String {
    let mut out = String::new();
    body.read_to_string(&mut out).expect("failed to drain script body");
    out
}
