use crate::models::constants::{DESCRIPTOR_FILE, MOD_EXTENSION};
use crate::models::error::SError;
use crate::utils::file::FileUtils;
use crate::utils::path::{has_extension, last_segment, trim_separators};
use camino::Utf8Path;
use std::fs::File;
use std::io::Read;
use zip::ZipArchive;

#[derive(Clone, Debug, PartialEq)]
pub struct DescriptorFileInfo {
    pub file_name: String,
    pub content: String,
    pub is_read_only: bool,
}

#[derive(Clone, Copy, Debug)]
pub enum DescriptorLookup<'a> {
    /// Exact, case-sensitive file name.
    Exact(&'a str),
    /// Any file ending with the extension (case-insensitive).
    Extension(&'a str),
}

impl DescriptorLookup<'_> {
    fn matches(&self, file_name: &str) -> bool {
        match self {
            DescriptorLookup::Exact(name) => file_name == *name,
            DescriptorLookup::Extension(ext) => has_extension(file_name, ext),
        }
    }
}

/// Reads descriptor files out of mod folders and zip/bin packages.
pub struct DescriptorReader;

impl DescriptorReader {
    /// Looks for `descriptor.mod` first, then any `*.mod` file.
    /// `Ok(None)` means the candidate simply is not a mod.
    pub fn read_descriptor(path: &Utf8Path) -> Result<Option<DescriptorFileInfo>, SError> {
        if let Some(info) = Self::get_file_info(path, DescriptorLookup::Exact(DESCRIPTOR_FILE))? {
            return Ok(Some(info));
        }
        Self::get_file_info(path, DescriptorLookup::Extension(MOD_EXTENSION))
    }

    pub fn get_file_info(
        path: &Utf8Path,
        lookup: DescriptorLookup<'_>,
    ) -> Result<Option<DescriptorFileInfo>, SError> {
        if path.is_dir() {
            Self::from_directory(path, lookup)
        } else if path.is_file() {
            Self::from_package(path, lookup)
        } else {
            Ok(None)
        }
    }

    /// Content files of a mod folder or package, relative and forward-slash separated.
    pub fn list_files(path: &Utf8Path) -> Result<Vec<String>, SError> {
        if path.is_dir() {
            return FileUtils::collect_files_lenient(path)
                .iter()
                .map(|f| FileUtils::relative_entry_name(path, f))
                .collect();
        }

        let mut archive = ZipArchive::new(File::open(path)?)?;
        let mut files = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            files.push(trim_separators(&entry.name().replace('\\', "/")).to_string());
        }
        Ok(files)
    }

    fn from_directory(
        dir: &Utf8Path,
        lookup: DescriptorLookup<'_>,
    ) -> Result<Option<DescriptorFileInfo>, SError> {
        let file = match lookup {
            DescriptorLookup::Exact(name) => {
                let candidate = dir.join(name);
                candidate.is_file().then_some(candidate)
            }
            DescriptorLookup::Extension(_) => {
                let mut matches: Vec<_> = dir
                    .read_dir_utf8()?
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
                    .filter(|e| lookup.matches(e.file_name()))
                    .map(|e| e.into_path())
                    .collect();
                matches.sort();
                matches.into_iter().next()
            }
        };

        let Some(file) = file else {
            return Ok(None);
        };

        Ok(Some(DescriptorFileInfo {
            file_name: file.file_name().unwrap_or_default().to_string(),
            content: std::fs::read_to_string(&file)?,
            is_read_only: FileUtils::is_read_only(&file)?,
        }))
    }

    fn from_package(
        package: &Utf8Path,
        lookup: DescriptorLookup<'_>,
    ) -> Result<Option<DescriptorFileInfo>, SError> {
        let mut archive = ZipArchive::new(File::open(package)?)?;

        // Shallowest match wins, so a nested copy never shadows the root descriptor.
        let mut best: Option<(usize, usize)> = None;
        for i in 0..archive.len() {
            let entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().replace('\\', "/");
            let Some(file_name) = last_segment(&name) else {
                continue;
            };
            if !lookup.matches(file_name) {
                continue;
            }
            let depth = trim_separators(&name).matches('/').count();
            if best.map_or(true, |(_, d)| depth < d) {
                best = Some((i, depth));
            }
        }

        let Some((index, _)) = best else {
            return Ok(None);
        };

        let mut entry = archive.by_index(index)?;
        let mut content = String::new();
        entry.read_to_string(&mut content)?;

        Ok(Some(DescriptorFileInfo {
            file_name: last_segment(&entry.name().replace('\\', "/"))
                .unwrap_or_default()
                .to_string(),
            content,
            is_read_only: FileUtils::is_read_only(package)?,
        }))
    }
}
