//! Bootstrap compiler for the grammar DSL.
//!
//! The grammar source is tokenized with the engine's own lexer, so action
//! holes arrive as first-class stream elements, then parsed with a
//! hand-written ordered-choice descent over this meta-grammar:
//!
//! ```text
//! grammar    ::= production+ EOF
//! production ::= IDENT "::=" body ";"
//! body       ::= seq ("/" seq)*
//! seq        ::= atom* HOLE?          -- trailing hole is the action
//! atom       ::= prim ("*"|"+"|"?"|("**"|"++") prim)?
//! prim       ::= STRING | IDENT | HOLE | "(" body ")"
//! ```
//!
//! A hole is the alternative's action only when the element after it ends
//! the sequence (`/`, `;`, `)`, or end of grammar); anywhere else it is an
//! input placeholder matched like the `HOLE` terminal.

use compact_str::CompactString;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::{GrammarError, ParseError};
use crate::grammar::expr::{Alternative, BnfExpr, Builtin, Production};
use crate::grammar::{KeywordSet, RuleSet};
use crate::intern::{NameId, NameTable};
use crate::lexer::{self, token::Element, TokenPattern};
use crate::template::Template;
use crate::value::Action;

pub(crate) fn compile(template: &Template<Action>) -> Result<RuleSet, ParseError> {
    let stream = lexer::tokenize(template.segments(), TokenPattern::default_pattern())?;
    let mut meta = Meta {
        stream,
        names: NameTable::new(),
        literals: Vec::new(),
        literal_ids: HashMap::with_hasher(ahash::RandomState::new()),
        keywords: KeywordSet::with_hasher(ahash::RandomState::new()),
    };

    let mut productions = Vec::new();
    let mut pos = 0usize;
    loop {
        pos = meta.skip(pos);
        if pos >= meta.stream.len() {
            break;
        }
        let (next, production) = meta.production(pos)?;
        productions.push(production);
        pos = next;
    }
    if productions.is_empty() {
        return Err(GrammarError::EmptyGrammar.into());
    }

    let mut by_name: HashMap<NameId, u32, ahash::RandomState> =
        HashMap::with_hasher(ahash::RandomState::new());
    for (index, production) in productions.iter().enumerate() {
        if by_name.insert(production.name, index as u32).is_some() {
            return Err(GrammarError::InvalidGrammar {
                at: meta.names.resolve(production.name).to_string(),
                message: "duplicate production".to_string(),
            }
            .into());
        }
    }
    for production in &mut productions {
        for alt in &mut production.body {
            resolve_alt(alt, &by_name);
        }
    }

    Ok(RuleSet {
        productions,
        by_name,
        names: meta.names.seal(),
        literals: meta.literals,
        actions: template.holes().to_vec(),
        keywords: meta.keywords,
    })
}

struct Meta {
    stream: Vec<Element>,
    names: NameTable,
    literals: Vec<CompactString>,
    literal_ids: HashMap<CompactString, u32, ahash::RandomState>,
    keywords: KeywordSet,
}

impl Meta {
    fn skip(&self, mut pos: usize) -> usize {
        while let Some(Element::Token(token)) = self.stream.get(pos) {
            let text = token.text();
            if lexer::space_re().is_match(text) || lexer::comment_re().is_match(text) {
                pos += 1;
            } else {
                break;
            }
        }
        pos
    }

    fn describe(&self, pos: usize) -> String {
        match self.stream.get(self.skip(pos)) {
            Some(element) => element.to_string(),
            None => "end of grammar".to_string(),
        }
    }

    fn err(&self, pos: usize, message: &str) -> ParseError {
        GrammarError::InvalidGrammar {
            at: self.describe(pos),
            message: message.to_string(),
        }
        .into()
    }

    fn eat_exact(&self, pos: usize, text: &str) -> Option<usize> {
        let pos = self.skip(pos);
        match self.stream.get(pos) {
            Some(Element::Token(token)) if token.text() == text => Some(pos + 1),
            _ => None,
        }
    }

    fn eat_ident(&self, pos: usize) -> Option<(usize, CompactString)> {
        let pos = self.skip(pos);
        match self.stream.get(pos) {
            Some(Element::Token(token)) if lexer::ident_re().is_match(token.text()) => {
                Some((pos + 1, token.text.clone()))
            }
            _ => None,
        }
    }

    fn eat_string(&self, pos: usize) -> Option<(usize, CompactString)> {
        let pos = self.skip(pos);
        match self.stream.get(pos) {
            Some(Element::Token(token)) if lexer::string_re().is_match(token.text()) => {
                Some((pos + 1, unquote(token.text())))
            }
            _ => None,
        }
    }

    fn eat_hole(&self, pos: usize) -> Option<(usize, u32)> {
        let pos = self.skip(pos);
        match self.stream.get(pos) {
            Some(Element::Hole(index)) => Some((pos + 1, *index)),
            _ => None,
        }
    }

    fn production(&mut self, pos: usize) -> Result<(usize, Production), ParseError> {
        let (pos, name) = self
            .eat_ident(pos)
            .ok_or_else(|| self.err(pos, "expected production name"))?;
        let pos = self
            .eat_exact(pos, "::=")
            .ok_or_else(|| self.err(pos, "expected \"::=\""))?;
        let (pos, body) = self.body(pos)?;
        let pos = self
            .eat_exact(pos, ";")
            .ok_or_else(|| self.err(pos, "expected \";\""))?;
        let name = self.names.intern(&name);
        Ok((pos, Production { name, body }))
    }

    fn body(&mut self, pos: usize) -> Result<(usize, Vec<Alternative>), ParseError> {
        let (mut pos, first) = self.seq(pos)?;
        let mut alts = vec![first];
        while let Some(next) = self.eat_exact(pos, "/") {
            let (next, alt) = self.seq(next)?;
            alts.push(alt);
            pos = next;
        }
        Ok((pos, alts))
    }

    fn seq(&mut self, mut pos: usize) -> Result<(usize, Alternative), ParseError> {
        let mut atoms: SmallVec<[BnfExpr; 4]> = SmallVec::new();
        let mut action = None;
        loop {
            if let Some((next, hole)) = self.eat_hole(pos) {
                if self.at_seq_end(next) {
                    action = Some(hole);
                    pos = next;
                    break;
                }
                atoms.push(BnfExpr::Builtin(Builtin::Hole));
                pos = next;
                continue;
            }
            match self.atom(pos)? {
                Some((next, atom)) => {
                    atoms.push(atom);
                    pos = next;
                }
                None => break,
            }
        }
        Ok((pos, Alternative { atoms, action }))
    }

    fn at_seq_end(&self, pos: usize) -> bool {
        let pos = self.skip(pos);
        match self.stream.get(pos) {
            None => true,
            Some(Element::Token(token)) => matches!(token.text(), "/" | ";" | ")"),
            Some(Element::Hole(_)) => false,
        }
    }

    fn atom(&mut self, pos: usize) -> Result<Option<(usize, BnfExpr)>, ParseError> {
        let Some((pos, prim)) = self.prim(pos)? else {
            return Ok(None);
        };
        let look = self.skip(pos);
        let postfix = match self.stream.get(look) {
            Some(Element::Token(token)) => Some(token.text.clone()),
            _ => None,
        };
        match postfix.as_deref() {
            Some("*") => Ok(Some((look + 1, BnfExpr::Star(Box::new(prim))))),
            Some("+") => Ok(Some((look + 1, BnfExpr::Plus(Box::new(prim))))),
            Some("?") => Ok(Some((look + 1, BnfExpr::Opt(Box::new(prim))))),
            Some(op @ ("**" | "++")) => {
                let min_one = op == "++";
                let Some((after, sep)) = self.prim(look + 1)? else {
                    return Err(self.err(look + 1, "expected separator after repetition operator"));
                };
                Ok(Some((
                    after,
                    BnfExpr::Sep {
                        item: Box::new(prim),
                        sep: Box::new(sep),
                        min_one,
                    },
                )))
            }
            _ => Ok(Some((pos, prim)))
        }
    }

    fn prim(&mut self, pos: usize) -> Result<Option<(usize, BnfExpr)>, ParseError> {
        if let Some((next, text)) = self.eat_string(pos) {
            let id = self.intern_literal(text);
            return Ok(Some((next, BnfExpr::Lit(id))));
        }
        if let Some((next, name)) = self.eat_ident(pos) {
            let expr = match Builtin::from_name(&name) {
                Some(builtin) => BnfExpr::Builtin(builtin),
                None => BnfExpr::Ref(self.names.intern(&name)),
            };
            return Ok(Some((next, expr)));
        }
        if let Some(next) = self.eat_exact(pos, "(") {
            let (next, body) = self.body(next)?;
            let next = self
                .eat_exact(next, ")")
                .ok_or_else(|| self.err(next, "expected \")\""))?;
            return Ok(Some((next, BnfExpr::Group(body))));
        }
        Ok(None)
    }

    fn intern_literal(&mut self, text: CompactString) -> u32 {
        if lexer::ident_re().is_match(&text) {
            self.keywords.insert(text.clone());
        }
        if let Some(id) = self.literal_ids.get(&text) {
            return *id;
        }
        let id = self.literals.len() as u32;
        self.literal_ids.insert(text.clone(), id);
        self.literals.push(text);
        id
    }
}

/// Decode the inner text of a double-quoted DSL string literal.
///
/// The token has already matched the string pattern, so the quotes are
/// present and every escape is well-formed.
fn unquote(text: &str) -> CompactString {
    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = chars.next().and_then(|d| d.to_digit(16)).unwrap_or(0);
                    code = code * 16 + digit;
                }
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out.into()
}

fn resolve_alt(alt: &mut Alternative, by_name: &HashMap<NameId, u32, ahash::RandomState>) {
    for atom in &mut alt.atoms {
        resolve_expr(atom, by_name);
    }
}

fn resolve_expr(expr: &mut BnfExpr, by_name: &HashMap<NameId, u32, ahash::RandomState>) {
    match expr {
        BnfExpr::Ref(name) => {
            let name = *name;
            if let Some(index) = by_name.get(&name) {
                *expr = BnfExpr::Call(*index);
            }
        }
        BnfExpr::Group(alts) => {
            for alt in alts {
                resolve_alt(alt, by_name);
            }
        }
        BnfExpr::Opt(inner) | BnfExpr::Star(inner) | BnfExpr::Plus(inner) => {
            resolve_expr(inner, by_name);
        }
        BnfExpr::Sep { item, sep, .. } => {
            resolve_expr(item, by_name);
            resolve_expr(sep, by_name);
        }
        BnfExpr::Lit(_) | BnfExpr::Builtin(_) | BnfExpr::Call(_) => {}
    }
}
