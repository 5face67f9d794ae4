use anyhow::{anyhow, Result};
use freespace_core::format_bytes;

#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceRequest {
    pub required_bytes: u64,
    /// Extra bytes that must stay free after the write.
    pub reserve_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceDecision {
    Sufficient { headroom: u64 },
    Insufficient { required: u64, available: u64 },
}

pub fn check_free_space(request: &SpaceRequest, available: u64) -> SpaceDecision {
    if request.required_bytes == 0 {
        return SpaceDecision::Sufficient {
            headroom: available,
        };
    }

    let required = request.required_bytes.saturating_add(request.reserve_bytes);
    if required > available {
        return SpaceDecision::Insufficient {
            required,
            available,
        };
    }

    SpaceDecision::Sufficient {
        headroom: available - required,
    }
}

impl SpaceDecision {
    pub fn is_sufficient(&self) -> bool {
        matches!(self, SpaceDecision::Sufficient { .. })
    }

    /// Headroom left after the request, or an error naming both sizes.
    pub fn ensure(self) -> Result<u64> {
        match self {
            SpaceDecision::Sufficient { headroom } => Ok(headroom),
            SpaceDecision::Insufficient {
                required,
                available,
            } => Err(anyhow!(
                "insufficient free space: required {} ({}), available {} ({})",
                required,
                format_bytes(required),
                available,
                format_bytes(available)
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_when_request_fits() {
        let request = SpaceRequest {
            required_bytes: 1000,
            reserve_bytes: 0,
        };
        assert_eq!(
            check_free_space(&request, 4096),
            SpaceDecision::Sufficient { headroom: 3096 }
        );
    }

    #[test]
    fn denies_when_request_exceeds_available() {
        let request = SpaceRequest {
            required_bytes: 5000,
            reserve_bytes: 0,
        };
        assert!(matches!(
            check_free_space(&request, 4096),
            SpaceDecision::Insufficient {
                required: 5000,
                available: 4096
            }
        ));
    }

    #[test]
    fn reserve_counts_against_available() {
        let request = SpaceRequest {
            required_bytes: 3000,
            reserve_bytes: 2000,
        };
        assert!(!check_free_space(&request, 4096).is_sufficient());
    }

    #[test]
    fn exact_fit_is_allowed() {
        let request = SpaceRequest {
            required_bytes: 4096,
            reserve_bytes: 0,
        };
        assert_eq!(check_free_space(&request, 4096).ensure().unwrap(), 0);
    }

    #[test]
    fn nothing_to_download_is_always_fine() {
        let request = SpaceRequest {
            required_bytes: 0,
            reserve_bytes: 1 << 40,
        };
        assert!(check_free_space(&request, 0).is_sufficient());
    }

    #[test]
    fn reserve_saturates_instead_of_wrapping() {
        let request = SpaceRequest {
            required_bytes: u64::MAX,
            reserve_bytes: 10,
        };
        assert!(matches!(
            check_free_space(&request, u64::MAX - 1),
            SpaceDecision::Insufficient {
                required: u64::MAX,
                ..
            }
        ));
    }

    #[test]
    fn refusal_message_names_both_sizes() {
        let request = SpaceRequest {
            required_bytes: 2048,
            reserve_bytes: 0,
        };
        let err = check_free_space(&request, 1024).ensure().unwrap_err();
        assert_eq!(
            err.to_string(),
            "insufficient free space: required 2048 (2 KB), available 1024 (1 KB)"
        );
    }
}
