//! Output writer.
//!
//! Mirrors a [`SiteOutput`] onto disk:
//!
//! ```text
//! out_dir/
//!   {page path}.html        one per page, folders mirrored
//!   styles/...              verbatim copy
//!   resources/...           verbatim copy
//! ```

use crate::compiler::{BuildError, OutputDocument, SiteOutput};
use crate::content::{Entry, File, Folder};
use crate::markup::inline::OUTPUT_EXTENSION;
use crate::utils::minify::minify_html;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const STYLES_DIR: &str = "styles";
pub const RESOURCES_DIR: &str = "resources";

/// Delete `out_dir` recursively. A missing directory is not an error.
pub fn clean(out_dir: &Path) -> Result<(), BuildError> {
    match fs::remove_dir_all(out_dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(BuildError::io(out_dir, err)),
    }
}

/// Write pages and static branches under `out_dir`.
///
/// Returns the number of files written.
pub fn write_site(site: &SiteOutput<'_>, out_dir: &Path, minify: bool) -> Result<usize, BuildError> {
    let mut written = write_folder(&site.pages, out_dir, &mut |doc: &OutputDocument| {
        let html = minify_html(doc.html.as_bytes(), minify).into_owned();
        (format!("{}.{OUTPUT_EXTENSION}", doc.name), html)
    })?;
    written += write_folder(site.styles, &out_dir.join(STYLES_DIR), &mut copy_file)?;
    written += write_folder(site.resources, &out_dir.join(RESOURCES_DIR), &mut copy_file)?;
    Ok(written)
}

fn copy_file(file: &File) -> (String, Vec<u8>) {
    (file.file_name(), file.content.clone())
}

/// Create `dir` and write every file of `folder` into it, recursively.
fn write_folder<F>(
    folder: &Folder<F>,
    dir: &Path,
    render: &mut impl FnMut(&F) -> (String, Vec<u8>),
) -> Result<usize, BuildError> {
    fs::create_dir_all(dir).map_err(|err| BuildError::io(dir, err))?;

    let mut written = 0;
    for (key, entry) in &folder.children {
        match entry {
            Entry::Folder(sub) => written += write_folder(sub, &dir.join(key), render)?,
            Entry::File(file) => {
                let (name, content) = render(file);
                let path = dir.join(name);
                fs::write(&path, content).map_err(|err| BuildError::io(&path, err))?;
                written += 1;
            }
        }
    }
    Ok(written)
}
