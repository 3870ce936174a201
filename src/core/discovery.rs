use crate::core::descriptor_parser::DescriptorParser;
use crate::core::descriptor_reader::DescriptorReader;
use crate::core::source_resolver;
use crate::models::error::SError;
use crate::models::mod_dto::{DiscoveryResult, Mod, ModCandidate, ModSource};
use crate::utils::path::{is_package_file, standardize_directory_separator, to_forward_slashes};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, error, instrument, warn};

/// Scans a mods root for loose packages, package folders and plain mod folders.
pub struct ModDiscovery<'a> {
    parser: &'a dyn DescriptorParser,
}

impl<'a> ModDiscovery<'a> {
    pub fn new(parser: &'a dyn DescriptorParser) -> Self {
        Self { parser }
    }

    /// One result per candidate that carries a descriptor. A candidate that fails to
    /// read or parse is returned flagged `invalid`; it never aborts the scan.
    #[instrument(skip(self))]
    pub fn discover(&self, root: &Utf8Path, hint: ModSource) -> Vec<DiscoveryResult> {
        let candidates = match Self::enumerate_candidates(root, hint) {
            Ok(candidates) => candidates,
            Err(e) => {
                error!("Failed to enumerate mods in {root}: {e}");
                return Vec::new();
            }
        };
        debug!("{} candidates under {root}", candidates.len());

        candidates
            .iter()
            .filter_map(|candidate| self.process_candidate(candidate))
            .collect()
    }

    /// Top-level packages first, then each subdirectory: its packages if it has any,
    /// otherwise the directory itself. Both phases are ordered by name.
    pub fn enumerate_candidates(
        root: &Utf8Path,
        hint: ModSource,
    ) -> Result<Vec<ModCandidate>, SError> {
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let (files, directories) = Self::list_entries(root)?;
        let mut candidates: Vec<ModCandidate> = files
            .into_iter()
            .filter(|f| is_package_file(f.as_str()))
            .map(|path| ModCandidate {
                path,
                is_directory: false,
                source: hint,
                listing_error: None,
            })
            .collect();

        for directory in directories {
            let source = source_resolver::effective_source(&directory, hint);
            let packages: Vec<_> = match Self::list_entries(&directory) {
                Ok((files, _)) => files
                    .into_iter()
                    .filter(|f| is_package_file(f.as_str()))
                    .collect(),
                Err(e) => {
                    warn!("Could not list {directory}: {e}");
                    candidates.push(ModCandidate {
                        path: directory,
                        is_directory: true,
                        source,
                        listing_error: Some(e.to_string()),
                    });
                    continue;
                }
            };

            if packages.is_empty() {
                candidates.push(ModCandidate {
                    path: directory,
                    is_directory: true,
                    source,
                    listing_error: None,
                });
            } else {
                candidates.extend(packages.into_iter().map(|path| ModCandidate {
                    path,
                    is_directory: false,
                    source,
                    listing_error: None,
                }));
            }
        }

        Ok(candidates)
    }

    /// `None` when the candidate has no descriptor at all.
    pub fn process_candidate(&self, candidate: &ModCandidate) -> Option<DiscoveryResult> {
        if let Some(e) = &candidate.listing_error {
            error!("Failed to read mod at {}: {e}", candidate.path);
            return Some(DiscoveryResult {
                mod_entry: None,
                path: candidate.path.clone(),
                invalid: true,
                installed: false,
            });
        }

        let (mod_entry, invalid) = match self.resolve_candidate(candidate) {
            Ok(None) => return None,
            Ok(Some(m)) => (Some(m), false),
            Err(e) => {
                error!("Failed to read mod at {}: {e}", candidate.path);
                (None, true)
            }
        };

        Some(DiscoveryResult {
            mod_entry,
            path: candidate.path.clone(),
            invalid,
            installed: false,
        })
    }

    fn resolve_candidate(&self, candidate: &ModCandidate) -> Result<Option<Mod>, SError> {
        let Some(info) = DescriptorReader::read_descriptor(&candidate.path)? else {
            debug!("No descriptor in {}, skipping", candidate.path);
            return Ok(None);
        };

        let descriptor = self.parser.parse(&info.content)?;
        let mut mod_entry = Mod::from_descriptor(descriptor);
        mod_entry.file_name = to_forward_slashes(candidate.path.as_str());
        mod_entry.full_path = standardize_directory_separator(candidate.path.as_str());
        mod_entry.is_locked = info.is_read_only;
        mod_entry.files = DescriptorReader::list_files(&candidate.path)?;

        let resolution = source_resolver::resolve(
            &candidate.path,
            candidate.is_directory,
            candidate.source,
            mod_entry.remote_id,
        );
        mod_entry.descriptor_file = resolution.descriptor_file;
        mod_entry.remote_id = resolution.remote_id;
        mod_entry.source = resolution.source;

        Ok(Some(mod_entry))
    }

    /// Entries whose name is not UTF-8 or whose type cannot be read are skipped.
    fn list_entries(dir: &Utf8Path) -> Result<(Vec<Utf8PathBuf>, Vec<Utf8PathBuf>), SError> {
        let mut files = Vec::new();
        let mut directories = Vec::new();
        for entry in dir.read_dir_utf8()? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {dir}: {e}");
                    continue;
                }
            };
            let Ok(file_type) = entry.file_type() else {
                warn!("Skipping {}: file type unavailable", entry.path());
                continue;
            };
            if file_type.is_dir() {
                directories.push(entry.into_path());
            } else if file_type.is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        directories.sort();
        Ok((files, directories))
    }
}
