//! The normalized token model (spec §3): the interchange format every
//! parser and normalizer produces and every downstream consumer reads.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Closed tagged enumeration of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Spacing,
    Typography,
    BorderRadius,
    Shadow,
    Dimension,
    Number,
    String,
    Boolean,
}

/// All color math happens in `[0,1]` floats; integer byte values are an
/// input-side concept only (parsers divide by 255 before this type exists).
/// Missing alpha means fully opaque (`1.0`) — the field stays optional only
/// so emitters can omit it when a downstream format prefers that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorValue {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

impl ColorValue {
    pub fn new(r: f64, g: f64, b: f64, a: Option<f64>) -> Self {
        Self { r, g, b, a }
    }

    /// Effective alpha; `1.0` when omitted.
    pub fn alpha(&self) -> f64 {
        self.a.unwrap_or(1.0)
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.alpha().is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    Px,
    Rem,
    Em,
    Pt,
}

impl DimensionUnit {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "px" => Some(Self::Px),
            "rem" => Some(Self::Rem),
            "em" => Some(Self::Em),
            "pt" => Some(Self::Pt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Rem => "rem",
            Self::Em => "em",
            Self::Pt => "pt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionValue {
    pub value: f64,
    pub unit: DimensionUnit,
}

/// Superset of `DimensionUnit` that additionally allows `%`, per the
/// border-radius unit decision recorded in DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderRadiusUnit {
    Px,
    Rem,
    Em,
    #[serde(rename = "%")]
    Percent,
}

impl BorderRadiusUnit {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "px" => Some(Self::Px),
            "rem" => Some(Self::Rem),
            "em" => Some(Self::Em),
            "%" => Some(Self::Percent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BorderRadiusCorners {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_left: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderRadiusValue {
    pub value: f64,
    pub unit: BorderRadiusUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners: Option<BorderRadiusCorners>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowValue {
    pub color: ColorValue,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inset: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Number(f64),
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineHeight {
    Number(f64),
    Dimension(DimensionValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypographyValue {
    pub font_family: String,
    pub font_size: DimensionValue,
    pub font_weight: FontWeight,
    pub line_height: LineHeight,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<DimensionValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
}

/// The untagged-but-typed payload half of `TokenValueOrAlias`. Kept
/// separate from `TokenValueOrAlias` so constructors can check
/// payload/type correspondence (spec §3 invariant 3) in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenPayload {
    Bool(bool),
    Number(f64),
    String(String),
    Color(ColorValue),
    Dimension(DimensionValue),
    Typography(TypographyValue),
    BorderRadius(BorderRadiusValue),
    Shadow(ShadowValue),
}

impl TokenPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Color(_) => "color",
            Self::Dimension(_) => "dimension",
            Self::Typography(_) => "typography",
            Self::BorderRadius(_) => "borderRadius",
            Self::Shadow(_) => "shadow",
        }
    }

    fn matches(&self, ty: TokenType) -> bool {
        matches!(
            (self, ty),
            (Self::Bool(_), TokenType::Boolean)
                | (Self::Number(_), TokenType::Number)
                | (Self::String(_), TokenType::String)
                | (Self::Color(_), TokenType::Color)
                | (Self::Dimension(_), TokenType::Dimension)
                | (Self::Dimension(_), TokenType::Spacing)
                | (Self::Typography(_), TokenType::Typography)
                | (Self::BorderRadius(_), TokenType::BorderRadius)
                | (Self::Shadow(_), TokenType::Shadow)
        )
    }
}

/// Tagged sum: either a concrete value, or a symbolic, unresolved alias.
/// Resolving an alias to its target's value is explicitly out of scope for
/// the core (spec §1 non-goals, §9 "Cycles and back-references").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TokenValueOrAlias {
    Value { payload: TokenPayload },
    Alias { reference: String },
}

impl TokenValueOrAlias {
    pub fn value(payload: TokenPayload, ty: TokenType) -> Result<Self> {
        if !payload.matches(ty) {
            return Err(Error::PayloadTypeMismatch {
                expected: ty,
                actual: payload.kind(),
            });
        }
        Ok(Self::Value { payload })
    }

    pub fn alias(reference: impl Into<String>) -> Self {
        Self::Alias {
            reference: reference.into(),
        }
    }

    pub fn as_alias_reference(&self) -> Option<&str> {
        match self {
            Self::Alias { reference } => Some(reference),
            Self::Value { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedToken {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: TokenType,
    pub value: TokenValueOrAlias,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modes: Option<IndexMap<String, TokenValueOrAlias>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TokenMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub source: SourceKind,
}

impl NormalizedToken {
    /// Builds a token from an already-normalized `name`, enforcing
    /// invariants 1, 2 and 5 from spec §3. The payload/type match
    /// (invariant 3) is enforced earlier, by `TokenValueOrAlias::value`.
    pub fn new(
        name: impl Into<String>,
        r#type: TokenType,
        value: TokenValueOrAlias,
        modes: Option<IndexMap<String, TokenValueOrAlias>>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        let id = crate::name::id_from_name(&name);
        let modes = modes.filter(|m| !m.is_empty());
        Ok(Self {
            id,
            name,
            r#type,
            value,
            modes,
            description: None,
            metadata: None,
        })
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_metadata(mut self, metadata: TokenMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Figma,
    Dtcg,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSetMetadata {
    pub source: Option<SourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    pub tokens: IndexMap<String, NormalizedToken>,
    pub metadata: TokenSetMetadata,
}

impl TokenSet {
    pub fn new(metadata: TokenSetMetadata) -> Self {
        Self {
            tokens: IndexMap::new(),
            metadata,
        }
    }

    /// Inserts a token, returning the name of a displaced token if its name
    /// collided with an existing one (later wins — spec §4.6 rule 6 / §4.7
    /// rule 6 / §8 "name collision determinism").
    pub fn insert(&mut self, token: NormalizedToken) -> Option<NormalizedToken> {
        self.tokens.insert(token.name.clone(), token)
    }
}
