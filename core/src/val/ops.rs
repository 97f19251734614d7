use std::cmp::Ordering;
use std::ops;

use anyhow::{Result, anyhow};

use crate::val::Val;

fn numeric_pair(l: &Val, r: &Val) -> Option<(f64, f64)> {
    let a = match l {
        Val::Int(n) => *n as f64,
        Val::Float(x) => *x,
        _ => return None,
    };
    let b = match r {
        Val::Int(n) => *n as f64,
        Val::Float(x) => *x,
        _ => return None,
    };
    Some((a, b))
}

impl ops::Add for &Val {
    type Output = Result<Val>;

    fn add(self, rhs: &Val) -> Result<Val> {
        match (self, rhs) {
            (Val::Int(a), Val::Int(b)) => a
                .checked_add(*b)
                .map(Val::Int)
                .ok_or_else(|| anyhow!("Integer overflow in addition")),
            // String concatenation accepts any operand
            (Val::Str(a), b) => Ok(Val::Str(format!("{}{}", a, b).into())),
            (a, Val::Str(b)) => Ok(Val::Str(format!("{}{}", a, b).into())),
            (Val::List(a), Val::List(b)) => {
                let mut out = a.clone();
                out.extend(b.iter().cloned());
                Ok(Val::List(out))
            }
            (Val::List(a), b) => {
                let mut out = a.clone();
                out.push(b.clone());
                Ok(Val::List(out))
            }
            _ => numeric_pair(self, rhs)
                .map(|(a, b)| Val::Float(a + b))
                .ok_or_else(|| anyhow!("Cannot add {} and {}", self.type_name(), rhs.type_name())),
        }
    }
}

impl ops::Sub for &Val {
    type Output = Result<Val>;

    fn sub(self, rhs: &Val) -> Result<Val> {
        match (self, rhs) {
            (Val::Int(a), Val::Int(b)) => a
                .checked_sub(*b)
                .map(Val::Int)
                .ok_or_else(|| anyhow!("Integer overflow in subtraction")),
            _ => numeric_pair(self, rhs)
                .map(|(a, b)| Val::Float(a - b))
                .ok_or_else(|| {
                    anyhow!("Cannot subtract {} from {}", rhs.type_name(), self.type_name())
                }),
        }
    }
}

impl ops::Mul for &Val {
    type Output = Result<Val>;

    fn mul(self, rhs: &Val) -> Result<Val> {
        match (self, rhs) {
            (Val::Int(a), Val::Int(b)) => a
                .checked_mul(*b)
                .map(Val::Int)
                .ok_or_else(|| anyhow!("Integer overflow in multiplication")),
            _ => numeric_pair(self, rhs)
                .map(|(a, b)| Val::Float(a * b))
                .ok_or_else(|| {
                    anyhow!("Cannot multiply {} and {}", self.type_name(), rhs.type_name())
                }),
        }
    }
}

impl ops::Div for &Val {
    type Output = Result<Val>;

    fn div(self, rhs: &Val) -> Result<Val> {
        let (a, b) = numeric_pair(self, rhs).ok_or_else(|| {
            anyhow!("Cannot divide {} by {}", self.type_name(), rhs.type_name())
        })?;
        if b == 0.0 {
            return Err(anyhow!("Division by zero"));
        }
        // Integer division that divides evenly stays an int
        if let (Val::Int(x), Val::Int(y)) = (self, rhs) {
            let rem = x
                .checked_rem(*y)
                .ok_or_else(|| anyhow!("Integer overflow in division"))?;
            if rem == 0 {
                return x
                    .checked_div(*y)
                    .map(Val::Int)
                    .ok_or_else(|| anyhow!("Integer overflow in division"));
            }
        }
        Ok(Val::Float(a / b))
    }
}

impl ops::Rem for &Val {
    type Output = Result<Val>;

    fn rem(self, rhs: &Val) -> Result<Val> {
        match (self, rhs) {
            (Val::Int(a), Val::Int(b)) => {
                if *b == 0 {
                    Err(anyhow!("Division by zero"))
                } else {
                    a.checked_rem(*b)
                        .map(Val::Int)
                        .ok_or_else(|| anyhow!("Integer overflow in remainder"))
                }
            }
            _ => {
                let (a, b) = numeric_pair(self, rhs).ok_or_else(|| {
                    anyhow!("Cannot take {} modulo {}", self.type_name(), rhs.type_name())
                })?;
                if b == 0.0 {
                    return Err(anyhow!("Division by zero"));
                }
                Ok(Val::Float(a % b))
            }
        }
    }
}

impl Val {
    pub fn negate(&self) -> Result<Val> {
        match self {
            Val::Int(n) => n
                .checked_neg()
                .map(Val::Int)
                .ok_or_else(|| anyhow!("Integer overflow in negation")),
            Val::Float(x) => Ok(Val::Float(-x)),
            other => Err(anyhow!("Cannot negate {}", other.type_name())),
        }
    }

    pub fn compare(&self, other: &Val) -> Result<Ordering> {
        match (self, other) {
            (Val::Int(a), Val::Int(b)) => Ok(a.cmp(b)),
            (Val::Str(a), Val::Str(b)) => Ok(a.cmp(b)),
            _ => {
                let (a, b) = numeric_pair(self, other).ok_or_else(|| {
                    anyhow!("Cannot compare {} with {}", self.type_name(), other.type_name())
                })?;
                a.partial_cmp(&b)
                    .ok_or_else(|| anyhow!("Cannot order NaN"))
            }
        }
    }
}
