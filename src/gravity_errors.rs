use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GravityError {
    #[error(
        "Invalid degree or order: ({degree}, {order}), with max degree {max_degree} and max order {max_order}"
    )]
    InvalidDegreeOrder {
        degree: usize,
        order: usize,
        max_degree: usize,
        max_order: usize,
    },

    #[error("Invalid table bounds: max order {max_order} exceeds max degree {max_degree}")]
    InvalidMaxDegreeOrder { max_degree: usize, max_order: usize },

    #[error("Non-finite gravity field constant: {0}")]
    NonFiniteConstant(String),

    #[error("Invalid gravity calculator parameters: {0}")]
    InvalidParams(String),
}

impl PartialEq for GravityError {
    fn eq(&self, other: &Self) -> bool {
        use GravityError::*;
        match (self, other) {
            (
                InvalidDegreeOrder {
                    degree: d1,
                    order: o1,
                    max_degree: md1,
                    max_order: mo1,
                },
                InvalidDegreeOrder {
                    degree: d2,
                    order: o2,
                    max_degree: md2,
                    max_order: mo2,
                },
            ) => d1 == d2 && o1 == o2 && md1 == md2 && mo1 == mo2,
            (
                InvalidMaxDegreeOrder {
                    max_degree: d1,
                    max_order: o1,
                },
                InvalidMaxDegreeOrder {
                    max_degree: d2,
                    max_order: o2,
                },
            ) => d1 == d2 && o1 == o2,
            (NonFiniteConstant(a), NonFiniteConstant(b)) => a == b,
            (InvalidParams(a), InvalidParams(b)) => a == b,

            _ => false,
        }
    }
}
