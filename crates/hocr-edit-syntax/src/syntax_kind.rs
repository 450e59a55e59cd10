//! SyntaxKind enum for all tokens and nodes in the markup CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum,
//! and both dialects build their trees from the same kinds. Every byte in the
//! source must appear as a token in the tree.

/// All syntax kinds for the markup CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Content-mode tokens ===
    /// Character data between tags (whitespace included)
    TEXT,
    /// Entity or numeric character reference (`&amp;`, `&#38;`, `&#x26;`)
    CHAR_REF,
    /// `<!-- ... -->`
    COMMENT,
    /// `<![CDATA[ ... ]]>` (strict dialect only)
    CDATA,
    /// `<!DOCTYPE ...>` or any other `<! ...>` markup declaration
    DOCTYPE,
    /// `<? ... ?>`, including the XML declaration
    PROCESSING_INSTRUCTION,
    /// Unparsed body of a raw-text element (`script`, `style`)
    RAW_TEXT,
    /// `<` opening a start tag
    L_ANGLE,
    /// `</` opening an end tag
    L_ANGLE_SLASH,

    // === Tag-mode tokens ===
    /// Whitespace between tag name and attributes
    WHITESPACE,
    /// Tag or attribute name, or an unquoted attribute value
    NAME,
    /// `=` between attribute name and value
    EQ,
    /// Quoted attribute value, quotes included
    STRING,
    /// `>` closing a tag
    R_ANGLE,
    /// `/>` closing a self-closing tag
    SLASH_R_ANGLE,
    /// Stray `/` inside a tag
    SLASH,
    /// Any byte the tag lexer cannot place
    JUNK,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root document node
    ROOT,
    /// Element: start tag, content, optional end tag
    ELEMENT,
    /// `<name attr="value" ...>`
    START_TAG,
    /// `</name>`
    END_TAG,
    /// `name="value"`, `name=value` or a bare `name`
    ATTRIBUTE,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia inside tags.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE)
    }

    /// Returns true for tokens that carry character data inside an element.
    pub fn is_character_data(self) -> bool {
        matches!(self, Self::TEXT | Self::CHAR_REF | Self::CDATA)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkupLang {}

impl rowan::Language for MarkupLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<MarkupLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<MarkupLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<MarkupLang>;
