//! 写真コレクション
//!
//! 撮影順を保持する写真リスト。上限は [`MAX_PHOTOS`] 枚（アップロード容量の上限）。

use crate::error::{Error, Result};
use crate::types::Photo;
use serde::{Deserialize, Serialize};

/// 1セッションで保持できる写真の最大枚数
pub const MAX_PHOTOS: usize = 10;

/// 撮影順の写真コレクション
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Photo>", into = "Vec<Photo>")]
pub struct PhotoCollection {
    photos: Vec<Photo>,
}

impl PhotoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 末尾に追加。上限到達時は `Error::Capacity`
    pub fn try_add(&mut self, photo: Photo) -> Result<()> {
        if self.is_full() {
            return Err(Error::Capacity { max: MAX_PHOTOS });
        }
        self.photos.push(photo);
        Ok(())
    }

    /// 末尾に追加。上限到達時は何もせず `false`
    pub fn add(&mut self, photo: Photo) -> bool {
        self.try_add(photo).is_ok()
    }

    /// 指定IDの最初の写真を削除。存在しなければ `None`
    pub fn remove(&mut self, id: &str) -> Option<Photo> {
        let index = self.photos.iter().position(|p| p.id() == id)?;
        Some(self.photos.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id() == id)
    }

    pub fn size(&self) -> usize {
        self.photos.len()
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.photos.len() >= MAX_PHOTOS
    }

    /// 残り追加可能枚数
    pub fn remaining(&self) -> usize {
        MAX_PHOTOS.saturating_sub(self.photos.len())
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Photo> {
        self.photos.iter()
    }

    pub fn as_slice(&self) -> &[Photo] {
        &self.photos
    }
}

impl<'a> IntoIterator for &'a PhotoCollection {
    type Item = &'a Photo;
    type IntoIter = std::slice::Iter<'a, Photo>;

    fn into_iter(self) -> Self::IntoIter {
        self.photos.iter()
    }
}

impl TryFrom<Vec<Photo>> for PhotoCollection {
    type Error = Error;

    fn try_from(photos: Vec<Photo>) -> Result<Self> {
        if photos.len() > MAX_PHOTOS {
            return Err(Error::Capacity { max: MAX_PHOTOS });
        }
        Ok(Self { photos })
    }
}

impl From<PhotoCollection> for Vec<Photo> {
    fn from(collection: PhotoCollection) -> Self {
        collection.photos
    }
}
