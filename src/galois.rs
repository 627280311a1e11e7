//! Finite fields GF(p^n) = F_p[X] / (f(X))
//!
//! A [`GaloisField`] fixes the characteristic p, the degree n, a monic
//! irreducible modulus f of degree n and the symbol used to print the class
//! of X. Every [`FieldElement`] holds an `Arc` to its field and a polynomial
//! of degree < n, so elements are always in canonical form. Degree-one
//! fields use f = X, which makes their elements plain residues.
//!
//! Text form follows the computer-algebra convention used by the stored key
//! files: `16*a + 7`, `a^2 + 3`, `12`.

use crate::arith::{exact_root, is_probable_prime};
use crate::config::DEFAULT_SYMBOL;
use crate::conway::conway_polynomial;
use crate::error::{Error, Result};
use crate::field::{Field, Residue};
use crate::polynomial::Polynomial;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::Peekable;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::Chars;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, PartialEq, Eq)]
pub struct GaloisField {
    characteristic: BigUint,
    degree: usize,
    modulus: Polynomial<Residue>,
    symbol: String,
}

impl GaloisField {
    /// The prime field GF(p)
    pub fn prime(p: BigUint) -> Result<Arc<Self>> {
        check_characteristic(&p)?;
        let modulus = Polynomial::monomial(Residue::one(p.clone()), 1);
        Ok(Arc::new(Self::unchecked(p, modulus)))
    }

    /// GF(p^n) built on the Conway polynomial C(p, n)
    ///
    /// Degree one returns the prime field, whose elements are the same
    /// residues whichever linear modulus is used.
    pub fn conway(p: BigUint, degree: usize) -> Result<Arc<Self>> {
        if degree == 0 {
            return Err(Error::InvalidField("degree must be positive".into()));
        }
        if degree == 1 {
            return Self::prime(p);
        }
        check_characteristic(&p)?;
        let modulus = conway_polynomial(&p, degree)?;
        let field = Self::unchecked(p, modulus);
        debug!(field = %field, modulus = %field.modulus_string(), "built Conway field");
        Ok(Arc::new(field))
    }

    /// GF(p^n) with an explicit monic irreducible modulus
    ///
    /// `coefficients` run from the constant term up to the leading one.
    pub fn with_modulus(p: BigUint, coefficients: &[BigUint], symbol: &str) -> Result<Arc<Self>> {
        check_characteristic(&p)?;
        check_symbol(symbol)?;
        let modulus = Polynomial::new(
            coefficients
                .iter()
                .map(|c| Residue::new(c.clone(), p.clone()))
                .collect(),
        );
        match (modulus.degree(), modulus.leading()) {
            (Some(d), Some(lead)) if d >= 1 && lead.is_one() => {}
            _ => {
                return Err(Error::InvalidField(
                    "modulus must be monic of positive degree".into(),
                ))
            }
        }

        let mut field = Self::unchecked(p, modulus);
        field.symbol = symbol.to_string();
        if !field.is_irreducible() {
            return Err(Error::InvalidField(format!(
                "{} is reducible over GF({})",
                field.modulus_string(),
                field.characteristic
            )));
        }
        Ok(Arc::new(field))
    }

    /// Parses a modulus of the given degree from text such as `a^2 + 16*a + 3`
    ///
    /// Powers are checked against `degree` before any coefficients are
    /// allocated.
    pub fn with_modulus_text(
        p: BigUint,
        text: &str,
        symbol: &str,
        degree: usize,
    ) -> Result<Arc<Self>> {
        check_symbol(symbol)?;
        let terms = parse_terms(text, symbol)?;
        let highest = terms.iter().map(|(power, _)| *power).max().unwrap_or(0);
        if highest != degree {
            return Err(Error::parse(
                text,
                format!("modulus has degree {}, expected {}", highest, degree),
            ));
        }
        let len = degree
            .checked_add(1)
            .ok_or_else(|| Error::parse(text, "degree too large"))?;
        let coefficients = collect_coefficients(&terms, len, &p);
        Self::with_modulus(p, &coefficients, symbol)
    }

    /// The field of the given size and degree, as described in key records
    ///
    /// `order` must equal p^degree for a prime p.
    pub fn from_order(order: &BigUint, degree: usize) -> Result<Arc<Self>> {
        let k = u32::try_from(degree)
            .map_err(|_| Error::InvalidField(format!("degree {} is too large", degree)))?;
        let p = exact_root(order, k).ok_or_else(|| {
            Error::InvalidField(format!("{} is not a {}-th power", order, degree))
        })?;
        Self::conway(p, degree)
    }

    /// Same field with another generator symbol
    pub fn with_symbol(&self, symbol: &str) -> Result<Arc<Self>> {
        check_symbol(symbol)?;
        Ok(Arc::new(GaloisField {
            characteristic: self.characteristic.clone(),
            degree: self.degree,
            modulus: self.modulus.clone(),
            symbol: symbol.to_string(),
        }))
    }

    /// Quotient ring F_p[X] / (modulus) with no irreducibility check
    ///
    /// Only inversion can fail in such a ring; the Conway search uses it for
    /// candidate moduli.
    pub(crate) fn unchecked(p: BigUint, modulus: Polynomial<Residue>) -> Self {
        GaloisField {
            degree: modulus.degree().unwrap_or(0),
            characteristic: p,
            modulus,
            symbol: DEFAULT_SYMBOL.to_string(),
        }
    }

    pub fn characteristic(&self) -> &BigUint {
        &self.characteristic
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn modulus(&self) -> &Polynomial<Residue> {
        &self.modulus
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of elements, p^n
    pub fn order(&self) -> BigUint {
        num_traits::pow(self.characteristic.clone(), self.degree)
    }

    /// The modulus written in the generator symbol
    pub fn modulus_string(&self) -> String {
        format_terms(self.modulus.coeffs(), &self.symbol)
    }

    pub fn zero(self: &Arc<Self>) -> FieldElement {
        self.element(Polynomial::zero())
    }

    pub fn one(self: &Arc<Self>) -> FieldElement {
        self.from_u64(1)
    }

    pub fn from_u64(self: &Arc<Self>, value: u64) -> FieldElement {
        self.from_residue(&Residue::from_u64(value, self.characteristic.clone()))
    }

    /// Reduces a signed integer into the prime subfield
    pub fn from_integer(self: &Arc<Self>, value: &BigInt) -> FieldElement {
        let p = BigInt::from_biguint(Sign::Plus, self.characteristic.clone());
        let reduced = value.mod_floor(&p).magnitude().clone();
        self.from_residue(&Residue::new(reduced, self.characteristic.clone()))
    }

    pub fn from_residue(self: &Arc<Self>, value: &Residue) -> FieldElement {
        self.element(Polynomial::constant(value.clone()))
    }

    /// Element from coefficients, constant term first
    pub fn from_coefficients(self: &Arc<Self>, coefficients: &[BigUint]) -> FieldElement {
        let poly = Polynomial::new(
            coefficients
                .iter()
                .map(|c| Residue::new(c.clone(), self.characteristic.clone()))
                .collect(),
        );
        self.element(poly)
    }

    /// The class of X, printed as the generator symbol
    pub fn generator(self: &Arc<Self>) -> FieldElement {
        self.element(Polynomial::monomial(
            Residue::one(self.characteristic.clone()),
            1,
        ))
    }

    fn element(self: &Arc<Self>, poly: Polynomial<Residue>) -> FieldElement {
        FieldElement {
            poly: poly.rem_monic(&self.modulus),
            field: Arc::clone(self),
        }
    }

    /// Parses an element such as `12`, `16*a + 7` or `a^2 - 1`
    ///
    /// Integers are reduced modulo p. Powers of the generator at or above
    /// the field degree are rejected rather than reduced.
    pub fn parse(self: &Arc<Self>, text: &str) -> Result<FieldElement> {
        let terms = parse_terms(text, &self.symbol)?;
        if let Some((power, _)) = terms.iter().find(|(power, _)| *power >= self.degree) {
            return Err(Error::parse(
                text,
                format!(
                    "power {} of {} does not fit a field of degree {}",
                    power, self.symbol, self.degree
                ),
            ));
        }
        let coefficients = collect_coefficients(&terms, self.degree, &self.characteristic);
        Ok(self.from_coefficients(&coefficients))
    }

    /// Ben-Or test: f is irreducible iff gcd(X^(p^i) - X, f) = 1 for i <= n/2
    fn is_irreducible(&self) -> bool {
        if self.degree <= 1 {
            return true;
        }
        let ring = Arc::new(Self::unchecked(
            self.characteristic.clone(),
            self.modulus.clone(),
        ));
        let x = ring.generator();
        let mut power = x.clone();
        for _ in 0..self.degree / 2 {
            power = Field::pow(&power, &self.characteristic);
            let g = match Field::sub(&power, &x).poly.gcd(&self.modulus) {
                Ok(g) => g,
                Err(_) => return false,
            };
            if g.degree() != Some(0) {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for GaloisField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.degree == 1 {
            write!(f, "Finite Field of size {}", self.characteristic)
        } else {
            write!(
                f,
                "Finite Field in {} of size {}^{}",
                self.symbol, self.characteristic, self.degree
            )
        }
    }
}

fn check_characteristic(p: &BigUint) -> Result<()> {
    if is_probable_prime(p) {
        Ok(())
    } else {
        Err(Error::InvalidField(format!("{} is not prime", p)))
    }
}

fn check_symbol(symbol: &str) -> Result<()> {
    let mut chars = symbol.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidField(format!(
            "{:?} is not a valid generator symbol",
            symbol
        )))
    }
}

/// Element of a [`GaloisField`]
#[derive(Clone, Debug)]
pub struct FieldElement {
    field: Arc<GaloisField>,
    poly: Polynomial<Residue>,
}

impl FieldElement {
    pub fn field(&self) -> &Arc<GaloisField> {
        &self.field
    }

    pub fn poly(&self) -> &Polynomial<Residue> {
        &self.poly
    }

    /// Exactly `degree` coefficients, constant term first
    pub fn coefficients(&self) -> Vec<BigUint> {
        (0..self.field.degree)
            .map(|i| {
                self.poly
                    .coeff(i)
                    .map(|c| c.value().clone())
                    .unwrap_or_default()
            })
            .collect()
    }

    pub fn is_one(&self) -> bool {
        self.poly.degree() == Some(0) && self.poly.coeff(0).is_some_and(Residue::is_one)
    }

    pub fn same_field(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.field, &other.field) || self.field == other.field
    }

    /// Small integer multiple, used for curve constants such as 27
    pub fn times(&self, n: u64) -> Self {
        Field::mul(self, &self.field.from_u64(n))
    }

    fn with_poly(&self, poly: Polynomial<Residue>) -> Self {
        FieldElement {
            field: Arc::clone(&self.field),
            poly,
        }
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.same_field(other) && self.poly == other.poly
    }
}

impl Eq for FieldElement {}

impl Hash for FieldElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.poly.hash(state);
    }
}

impl Field for FieldElement {
    fn add(&self, other: &Self) -> Self {
        debug_assert!(self.same_field(other));
        self.with_poly(self.poly.add(&other.poly))
    }

    fn neg(&self) -> Self {
        self.with_poly(self.poly.neg())
    }

    fn mul(&self, other: &Self) -> Self {
        debug_assert!(self.same_field(other));
        let product = self.poly.mul(&other.poly);
        self.with_poly(product.rem_monic(&self.field.modulus))
    }

    /// Extended Euclidean algorithm in F_p[X]
    fn inv(&self) -> Result<Self> {
        if self.poly.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let modulus = &self.field.modulus;

        // Invariant: s * self ≡ r (mod f) for both (old_s, old_r) and (s, r)
        let mut old_r = modulus.clone();
        let mut r = self.poly.clone();
        let mut old_s = Polynomial::zero();
        let mut s = Polynomial::constant(Residue::one(self.field.characteristic.clone()));
        while !r.is_zero() {
            let (quotient, remainder) = old_r.div_rem(&r)?;
            old_r = std::mem::replace(&mut r, remainder);
            let next = old_s.sub(&quotient.mul(&s));
            old_s = std::mem::replace(&mut s, next);
        }

        match (old_r.degree(), old_r.leading()) {
            (Some(0), Some(gcd)) => {
                let inverse = old_s.scale(&gcd.inv()?);
                Ok(self.with_poly(inverse.rem_monic(modulus)))
            }
            _ => Err(Error::InvalidField(format!(
                "{} shares a factor with {}",
                self,
                self.field.modulus_string()
            ))),
        }
    }

    fn zero_like(&self) -> Self {
        self.with_poly(Polynomial::zero())
    }

    fn one_like(&self) -> Self {
        self.field.one()
    }

    fn is_zero(&self) -> bool {
        self.poly.is_zero()
    }
}

// Implement standard operators for convenience
impl Add for &FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        Field::add(self, other)
    }
}

impl Sub for &FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        Field::sub(self, other)
    }
}

impl Mul for &FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        Field::mul(self, other)
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        Field::neg(self)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&format_terms(self.poly.coeffs(), &self.field.symbol))
    }
}

/// `c*a^e + ... + c*a + c`, highest power first, unit coefficients omitted
fn format_terms(coeffs: &[Residue], symbol: &str) -> String {
    let terms: Vec<String> = coeffs
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, c)| !c.is_zero())
        .map(|(power, c)| match (power, c.is_one()) {
            (0, _) => c.to_string(),
            (1, true) => symbol.to_string(),
            (1, false) => format!("{}*{}", c, symbol),
            (_, true) => format!("{}^{}", symbol, power),
            (_, false) => format!("{}*{}^{}", c, symbol, power),
        })
        .collect();
    if terms.is_empty() {
        "0".to_string()
    } else {
        terms.join(" + ")
    }
}

fn collect_coefficients(terms: &[(usize, BigInt)], len: usize, p: &BigUint) -> Vec<BigUint> {
    let modulus = BigInt::from_biguint(Sign::Plus, p.clone());
    let mut sums = vec![BigInt::zero(); len];
    for (power, coeff) in terms {
        if let Some(slot) = sums.get_mut(*power) {
            *slot += coeff;
        }
    }
    sums.iter()
        .map(|c| c.mod_floor(&modulus).magnitude().clone())
        .collect()
}

#[derive(Debug, PartialEq)]
enum Token {
    Number(BigUint),
    Symbol(String),
    Star,
    Caret,
    Plus,
    Minus,
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '*' | '^' | '+' | '-' => {
                chars.next();
                tokens.push(match ch {
                    '*' => Token::Star,
                    '^' => Token::Caret,
                    '+' => Token::Plus,
                    _ => Token::Minus,
                });
            }
            c if c.is_ascii_digit() => {
                let digits = take_while(&mut chars, |c| c.is_ascii_digit());
                let value = digits
                    .parse::<BigUint>()
                    .map_err(|e| Error::parse(text, e.to_string()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let name = take_while(&mut chars, |c| c.is_ascii_alphanumeric() || c == '_');
                tokens.push(Token::Symbol(name));
            }
            other => {
                return Err(Error::parse(text, format!("unexpected character {:?}", other)));
            }
        }
    }
    Ok(tokens)
}

fn take_while(chars: &mut Peekable<Chars>, pred: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if !pred(c) {
            break;
        }
        out.push(c);
        chars.next();
    }
    out
}

/// Signed terms `(power, coefficient)` of a sum such as `3*a^2 - a + 1`
fn parse_terms(text: &str, symbol: &str) -> Result<Vec<(usize, BigInt)>> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(Error::parse(text, "empty field element"));
    }

    let fail = |reason: &str| Error::parse(text, reason.to_string());
    let mut terms = Vec::new();
    let mut iter = tokens.into_iter().peekable();
    let mut negative = false;
    if iter.peek() == Some(&Token::Minus) {
        negative = true;
        iter.next();
    }

    loop {
        let (coeff, has_symbol) = match iter.next() {
            Some(Token::Number(n)) => {
                if iter.peek() == Some(&Token::Star) {
                    iter.next();
                    match iter.next() {
                        Some(Token::Symbol(s)) if s == symbol => (n, true),
                        Some(Token::Symbol(s)) => return Err(fail(&format!("unknown symbol {}", s))),
                        _ => return Err(fail("expected generator after '*'")),
                    }
                } else {
                    (n, false)
                }
            }
            Some(Token::Symbol(s)) if s == symbol => (BigUint::one(), true),
            Some(Token::Symbol(s)) => return Err(fail(&format!("unknown symbol {}", s))),
            _ => return Err(fail("expected a term")),
        };

        let mut power = usize::from(has_symbol);
        if has_symbol && iter.peek() == Some(&Token::Caret) {
            iter.next();
            power = match iter.next() {
                Some(Token::Number(e)) => e.to_usize().ok_or_else(|| fail("exponent too large"))?,
                _ => return Err(fail("expected exponent after '^'")),
            };
        }

        let sign = if negative { Sign::Minus } else { Sign::Plus };
        terms.push((power, BigInt::from_biguint(sign, coeff)));

        match iter.next() {
            None => break,
            Some(Token::Plus) => negative = false,
            Some(Token::Minus) => negative = true,
            Some(_) => return Err(fail("expected '+' or '-' between terms")),
        }
    }
    Ok(terms)
}
