use libcnb::libcnb_runtime;
use std::env;
use std::ffi::OsStr;
use std::path::Path;

use play_jpa_plugin_buildpack::{cli, PlayJpaPluginBuildpack};

fn main() {
    // Using `std::env::args()` instead of `std::env::current_exe()` since the latter resolves
    // symlinks to their target on some platforms, whereas we need the original filename.
    let current_exe = env::args().next();
    let current_exe_file_name = current_exe
        .as_ref()
        .map(Path::new)
        .and_then(Path::file_name)
        .and_then(OsStr::to_str);

    match current_exe_file_name {
        Some("detect") | Some("build") => libcnb_runtime(&PlayJpaPluginBuildpack),
        _ => cli(),
    }
}
