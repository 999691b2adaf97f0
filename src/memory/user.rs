/*!
 * User Boundary
 *
 * Copies between caller-owned memory and kernel buffers. Copies may be
 * partial: the return value is the number of bytes actually transferred, and
 * a fault is only raised when the pointer does not address mapped memory.
 */

use super::types::{BoundaryError, BoundaryResult};
use crate::core::limits::{USER_MAPPING_GUARD, USER_SPACE_BASE};
use crate::core::types::{Address, Pid, Size};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, trace};

/// Address in a caller's address space
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPtr(Address);

impl UserPtr {
    pub const NULL: UserPtr = UserPtr(0);

    #[inline]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    #[inline]
    pub const fn addr(self) -> Address {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Pointer `bytes` past this one
    #[inline]
    #[must_use]
    pub const fn offset(self, bytes: Size) -> Self {
        Self(self.0.saturating_add(bytes))
    }
}

impl fmt::Debug for UserPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserPtr(0x{:x})", self.0)
    }
}

/// Copy contract between the kernel and a caller's address space
#[cfg_attr(test, mockall::automock)]
pub trait UserBoundary: Send + Sync {
    /// Copy up to `dst.len()` bytes from user memory into `dst`
    fn copy_from_user(&self, src: UserPtr, dst: &mut [u8]) -> BoundaryResult<Size>;

    /// Copy up to `src.len()` bytes from `src` into user memory
    fn copy_to_user(&self, dst: UserPtr, src: &[u8]) -> BoundaryResult<Size>;
}

struct AddressSpaceInner {
    mappings: BTreeMap<Address, Vec<u8>>,
    next_base: Address,
}

impl AddressSpaceInner {
    /// Find the mapping containing `address`, returning its base
    fn locate(&self, address: Address) -> Option<Address> {
        self.mappings
            .range(..=address)
            .next_back()
            .filter(|(base, bytes)| address < **base + bytes.len())
            .map(|(base, _)| *base)
    }
}

/// Simulated process address space
///
/// Mappings are separated by unmapped guard gaps, so a copy that runs past
/// the end of a mapping is cut short instead of spilling into its neighbour.
pub struct UserAddressSpace {
    pid: Pid,
    inner: RwLock<AddressSpaceInner>,
}

impl UserAddressSpace {
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            inner: RwLock::new(AddressSpaceInner {
                mappings: BTreeMap::new(),
                next_base: USER_SPACE_BASE,
            }),
        }
    }

    /// Map `len` zeroed bytes and return the base pointer
    pub fn map(&self, len: Size) -> UserPtr {
        self.map_bytes(&vec![0u8; len])
    }

    /// Map a copy of `bytes` and return the base pointer
    pub fn map_bytes(&self, bytes: &[u8]) -> UserPtr {
        let mut inner = self.inner.write();
        let base = inner.next_base;
        inner.next_base = base + bytes.len().max(1) + USER_MAPPING_GUARD;
        inner.mappings.insert(base, bytes.to_vec());
        debug!(pid = self.pid, base, len = bytes.len(), "Mapped user region");
        UserPtr(base)
    }

    /// Remove the mapping that starts at `ptr`
    pub fn unmap(&self, ptr: UserPtr) -> BoundaryResult<Size> {
        self.inner
            .write()
            .mappings
            .remove(&ptr.addr())
            .map(|bytes| bytes.len())
            .ok_or(BoundaryError::Fault { address: ptr.addr() })
    }

    /// Read up to `len` bytes starting at `ptr`
    pub fn read(&self, ptr: UserPtr, len: Size) -> BoundaryResult<Vec<u8>> {
        let mut out = vec![0u8; len];
        let copied = self.copy_from_user(ptr, &mut out)?;
        out.truncate(copied);
        Ok(out)
    }
}

impl UserBoundary for UserAddressSpace {
    fn copy_from_user(&self, src: UserPtr, dst: &mut [u8]) -> BoundaryResult<Size> {
        if dst.is_empty() {
            return Ok(0);
        }
        if src.is_null() {
            return Err(BoundaryError::Fault { address: 0 });
        }

        let inner = self.inner.read();
        let base = inner
            .locate(src.addr())
            .ok_or(BoundaryError::Fault { address: src.addr() })?;
        let mapping = &inner.mappings[&base];
        let offset = src.addr() - base;
        let copied = dst.len().min(mapping.len() - offset);

        dst[..copied].copy_from_slice(&mapping[offset..offset + copied]);
        trace!(pid = self.pid, requested = dst.len(), copied, "copy_from_user");
        Ok(copied)
    }

    fn copy_to_user(&self, dst: UserPtr, src: &[u8]) -> BoundaryResult<Size> {
        if src.is_empty() {
            return Ok(0);
        }
        if dst.is_null() {
            return Err(BoundaryError::Fault { address: 0 });
        }

        let mut inner = self.inner.write();
        let base = inner
            .locate(dst.addr())
            .ok_or(BoundaryError::Fault { address: dst.addr() })?;
        let offset = dst.addr() - base;
        let mapping = inner
            .mappings
            .get_mut(&base)
            .ok_or(BoundaryError::Fault { address: dst.addr() })?;
        let copied = src.len().min(mapping.len() - offset);

        mapping[offset..offset + copied].copy_from_slice(&src[..copied]);
        trace!(pid = self.pid, requested = src.len(), copied, "copy_to_user");
        Ok(copied)
    }
}
