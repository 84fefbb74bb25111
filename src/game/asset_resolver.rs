use std::collections::HashMap;
use std::path::PathBuf;

use log::{error, trace};
use thiserror::Error;

use crate::model::SymbolId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("no image for symbol {symbol}: {reason}")]
    Unavailable { symbol: SymbolId, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAsset {
    Loaded(PathBuf),
    Fallback(PathBuf),
}

impl ResolvedAsset {
    pub fn path(&self) -> &PathBuf {
        match self {
            ResolvedAsset::Loaded(path) | ResolvedAsset::Fallback(path) => path,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ResolvedAsset::Fallback(_))
    }
}

/// Looks up the image drawn for a symbol. Implemented by the host (HTTP, disk, bundle).
pub trait AssetResolver {
    fn resolve(&self, symbol: SymbolId) -> Result<PathBuf, AssetError>;

    fn fallback(&self) -> PathBuf;
}

/// Resolves `<root>/<n>.jpg`, falling back to the first image when a file is missing.
#[derive(Debug, Clone)]
pub struct DirectoryAssetResolver {
    root: PathBuf,
}

impl DirectoryAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, symbol: SymbolId) -> PathBuf {
        self.root.join(format!("{}.jpg", symbol.0))
    }
}

impl AssetResolver for DirectoryAssetResolver {
    fn resolve(&self, symbol: SymbolId) -> Result<PathBuf, AssetError> {
        let path = self.path_for(symbol);
        if path.is_file() {
            Ok(path)
        } else {
            Err(AssetError::Unavailable {
                symbol,
                reason: format!("{} does not exist", path.display()),
            })
        }
    }

    fn fallback(&self) -> PathBuf {
        self.path_for(SymbolId(1))
    }
}

impl<F> AssetResolver for F
where
    F: Fn(SymbolId) -> Result<PathBuf, AssetError>,
{
    fn resolve(&self, symbol: SymbolId) -> Result<PathBuf, AssetError> {
        self(symbol)
    }

    fn fallback(&self) -> PathBuf {
        PathBuf::from("1.jpg")
    }
}

/// Resolves every symbol and only returns once all of them are either loaded
/// or replaced by the fallback image.
pub fn resolve_all(
    resolver: &dyn AssetResolver,
    symbols: &[SymbolId],
) -> HashMap<SymbolId, ResolvedAsset> {
    symbols
        .iter()
        .map(|&symbol| {
            let asset = match resolver.resolve(symbol) {
                Ok(path) => {
                    trace!(target: "assets", "Loaded {} from {}", symbol, path.display());
                    ResolvedAsset::Loaded(path)
                }
                Err(err) => {
                    error!(target: "assets", "Failed to load image: {}", err);
                    ResolvedAsset::Fallback(resolver.fallback())
                }
            };
            (symbol, asset)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odd_symbols_only(symbol: SymbolId) -> Result<PathBuf, AssetError> {
        if symbol.0 % 2 == 1 {
            Ok(PathBuf::from(format!("img/{}.jpg", symbol.0)))
        } else {
            Err(AssetError::Unavailable {
                symbol,
                reason: "404".to_string(),
            })
        }
    }

    #[test]
    fn test_resolve_all_waits_for_every_symbol() {
        let symbols = SymbolId::pool(4);
        let resolved = resolve_all(&odd_symbols_only, &symbols);
        assert_eq!(resolved.len(), 4);
        assert_eq!(
            resolved[&SymbolId(1)],
            ResolvedAsset::Loaded(PathBuf::from("img/1.jpg"))
        );
        assert!(resolved[&SymbolId(2)].is_fallback());
        assert_eq!(resolved[&SymbolId(2)].path(), &PathBuf::from("1.jpg"));
    }

    #[test]
    fn test_directory_resolver_falls_back_for_missing_files() {
        let resolver = DirectoryAssetResolver::new("/definitely/not/a/real/dir");
        let resolved = resolve_all(&resolver, &[SymbolId(3)]);
        assert_eq!(
            resolved[&SymbolId(3)],
            ResolvedAsset::Fallback(PathBuf::from("/definitely/not/a/real/dir/1.jpg"))
        );
    }
}
