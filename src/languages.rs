//! The languages lustro knows about out of the box.

use std::sync::Arc;

use crate::class::TokenClass;
use crate::error::LustroResult;
use crate::grammars::{Pattern, Rule, SimpleLexer};
use crate::registry::{DEFAULT_CODE, DEFAULT_MARKUP, Registry};

const C_KEYWORDS: &str = "break continue do else for if return while auto case char const default \
    double enum extern float goto int long register short signed sizeof static struct switch \
    typedef union unsigned void volatile catch class delete false import new operator private \
    protected public this throw true try typeof";
const CPP_EXTRA_KEYWORDS: &str = "alignof align_union asm axiom bool concept concept_map \
    const_cast constexpr decltype dynamic_cast explicit export friend inline late_check mutable \
    namespace nullptr reinterpret_cast static_assert static_cast template typeid typename using \
    virtual wchar_t where";
const JAVA_EXTRA_KEYWORDS: &str = "abstract boolean byte extends final finally implements import \
    instanceof null native package strictfp super synchronized throws transient";
const CS_EXTRA_KEYWORDS: &str = "as base by checked decimal delegate descending event fixed \
    foreach from group implicit in interface internal into is lock object out override orderby \
    params partial readonly ref sbyte sealed stackalloc string select uint ulong unchecked unsafe \
    ushort var";
const JS_EXTRA_KEYWORDS: &str =
    "debugger eval export function get null set undefined var with Infinity NaN";
const PERL_KEYWORDS: &str = "caller delete die do dump elsif eval exit foreach for goto if import \
    last local my next no our print package redo require sub undef unless until use wantarray \
    while BEGIN END";
const FLOW_KEYWORDS: &str = "break continue do else for if return while";
const PYTHON_EXTRA_KEYWORDS: &str = "and as assert class def del elif except exec finally from \
    global import in is lambda nonlocal not or pass print raise try with yield False True None";
const RUBY_EXTRA_KEYWORDS: &str = "alias and begin case class def defined elsif end ensure false \
    in module next nil not or redo rescue retry self super then true undef unless until when \
    yield BEGIN END";
const SH_EXTRA_KEYWORDS: &str = "case done elif esac eval fi function in local set then until";
const PROTO_KEYWORDS: &str = "bool bytes default double enum extend extensions false fixed32 \
    fixed64 float group import int32 int64 max message option optional package repeated required \
    returns rpc service sfixed32 sfixed64 sint32 sint64 string syntax to true uint32 uint64";

const CPP_KEYWORDS: &[&str] = &[C_KEYWORDS, CPP_EXTRA_KEYWORDS];
const JAVA_KEYWORDS: &[&str] = &[C_KEYWORDS, JAVA_EXTRA_KEYWORDS];
const CS_KEYWORDS: &[&str] = &[C_KEYWORDS, JAVA_EXTRA_KEYWORDS, CS_EXTRA_KEYWORDS];
const JS_KEYWORDS: &[&str] = &[C_KEYWORDS, JS_EXTRA_KEYWORDS];
const PYTHON_KEYWORDS: &[&str] = &[FLOW_KEYWORDS, PYTHON_EXTRA_KEYWORDS];
const RUBY_KEYWORDS: &[&str] = &[FLOW_KEYWORDS, RUBY_EXTRA_KEYWORDS];
const SH_KEYWORDS: &[&str] = &[FLOW_KEYWORDS, SH_EXTRA_KEYWORDS];
const ALL_KEYWORDS: &[&str] = &[
    C_KEYWORDS,
    CPP_EXTRA_KEYWORDS,
    JAVA_EXTRA_KEYWORDS,
    CS_EXTRA_KEYWORDS,
    JS_EXTRA_KEYWORDS,
    PERL_KEYWORDS,
    FLOW_KEYWORDS,
    PYTHON_EXTRA_KEYWORDS,
    RUBY_EXTRA_KEYWORDS,
    SH_EXTRA_KEYWORDS,
];

/// Tokens after which a `/` starts a regex literal rather than a division
const REGEX_PRECEDERS: &[&str] = &[
    "!", "!=", "!==", "#", "%", "%=", "&", "&&", "&&=", "&=", "(", "*", "*=", "+=", ",", "-=",
    "->", "/", "/=", ":", "::", ";", "<", "<<", "<<=", "<=", "=", "==", "===", ">", ">=", ">>",
    ">>=", ">>>", ">>>=", "?", "@", "[", "^", "^=", "^^", "^^=", "{", "|", "|=", "||", "||=",
    "~", "break", "case", "continue", "delete", "do", "else", "finally", "instanceof", "return",
    "throw", "try", "typeof",
];

const SQL_KEYWORDS: &str = "ADD|ALL|ALTER|AND|ANY|AS|ASC|AUTHORIZATION|BACKUP|BEGIN|BETWEEN|\
BREAK|BROWSE|BULK|BY|CASCADE|CASE|CHECK|CHECKPOINT|CLOSE|CLUSTERED|COALESCE|COLLATE|COLUMN|\
COMMIT|COMPUTE|CONSTRAINT|CONTAINS|CONTAINSTABLE|CONTINUE|CONVERT|CREATE|CROSS|CURRENT|\
CURRENT_DATE|CURRENT_TIME|CURRENT_TIMESTAMP|CURRENT_USER|CURSOR|DATABASE|DBCC|DEALLOCATE|\
DECLARE|DEFAULT|DELETE|DENY|DESC|DISK|DISTINCT|DISTRIBUTED|DOUBLE|DROP|DUMMY|DUMP|ELSE|END|\
ERRLVL|ESCAPE|EXCEPT|EXEC|EXECUTE|EXISTS|EXIT|FETCH|FILE|FILLFACTOR|FOR|FOREIGN|FREETEXT|\
FREETEXTTABLE|FROM|FULL|FUNCTION|GOTO|GRANT|GROUP|HAVING|HOLDLOCK|IDENTITY|IDENTITYCOL|\
IDENTITY_INSERT|IF|IN|INDEX|INNER|INSERT|INTERSECT|INTO|IS|JOIN|KEY|KILL|LEFT|LIKE|LINENO|LOAD|\
NATIONAL|NOCHECK|NONCLUSTERED|NOT|NULL|NULLIF|OF|OFF|OFFSETS|ON|OPEN|OPENDATASOURCE|OPENQUERY|\
OPENROWSET|OPENXML|OPTION|OR|ORDER|OUTER|OVER|PERCENT|PLAN|PRECISION|PRIMARY|PRINT|PROC|\
PROCEDURE|PUBLIC|RAISERROR|READ|READTEXT|RECONFIGURE|REFERENCES|REPLICATION|RESTORE|RESTRICT|\
RETURN|REVOKE|RIGHT|ROLLBACK|ROWCOUNT|ROWGUIDCOL|RULE|SAVE|SCHEMA|SELECT|SESSION_USER|SET|\
SETUSER|SHUTDOWN|SOME|STATISTICS|SYSTEM_USER|TABLE|TEXTSIZE|THEN|TO|TOP|TRAN|TRANSACTION|\
TRIGGER|TRUNCATE|TSEQUAL|UNION|UNIQUE|UPDATE|UPDATETEXT|USE|USER|VALUES|VARYING|VIEW|WAITFOR|\
WHEN|WHERE|WHILE|WITH|WRITETEXT";

/// What the generic code lexer should recognise.
///
/// `keywords` is a list of whitespace separated keyword groups, duplicates are fine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDecoratorOptions<'a> {
    pub keywords: &'a [&'a str],
    /// `#` starts a comment, or a preprocessor directive with `c_style_comments`
    pub hash_comments: bool,
    /// `//` and `/* */` comments
    pub c_style_comments: bool,
    /// Strings can span lines and backticks delimit strings
    pub multi_line_strings: bool,
    /// Python's `'''` and `"""`
    pub triple_quoted_strings: bool,
    /// C#'s `@"..."`
    pub verbatim_strings: bool,
    /// `/.../` after an operator or keyword is a regex
    pub regex_literals: bool,
}

fn rule(class: TokenClass, source: &'static str) -> Rule {
    Rule::new(class, Pattern::new(source))
}

fn nocase(class: TokenClass, source: &'static str) -> Rule {
    Rule::new(class, Pattern::nocase(source))
}

/// `^(?:kw1|kw2|...)\b`, or nothing if there are no keywords.
fn keyword_pattern(groups: &[&str]) -> Option<String> {
    let mut keywords: Vec<&str> = Vec::new();
    for keyword in groups.iter().flat_map(|group| group.split_whitespace()) {
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    if keywords.is_empty() {
        return None;
    }
    Some(format!(r"^(?:{})\b", keywords.join("|")))
}

/// Matches a regex literal, the text before it included so the `/` can't be read as a division.
fn regex_literal_pattern() -> String {
    let mut out = String::from(r"^(?:^^|[+-]");
    for preceder in REGEX_PRECEDERS {
        out.push('|');
        for c in preceder.chars() {
            if !matches!(c, '=' | '<' | '>' | ':' | '&' | 'a'..='z') {
                out.push('\\');
            }
            out.push(c);
        }
    }
    out.push_str(r")\s*");
    out.push_str(
        r"(/(?=[^/*])(?:[^/\x5B\x5C]|\x5C[\s\S]|\x5B(?:[^\x5C\x5D]|\x5C[\s\S])*(?:\x5D|$))+/)",
    );
    out
}

/// Builds the keyword-driven lexer used by most programming languages.
pub fn source_decorator(options: &SourceDecoratorOptions<'_>) -> LustroResult<SimpleLexer> {
    let mut shortcut = Vec::new();
    let mut fallthrough = Vec::new();

    if options.triple_quoted_strings {
        shortcut.push(
            rule(
                TokenClass::Str,
                r#"^(?:'''(?:[^'\\]|\\[\s\S]|'{1,2}(?=[^']))*(?:'''|$)|"""(?:[^"\\]|\\[\s\S]|"{1,2}(?=[^"]))*(?:"""|$)|'(?:[^\\']|\\[\s\S])*(?:'|$)|"(?:[^\\"]|\\[\s\S])*(?:"|$))"#,
            )
            .dispatch("'\""),
        );
    } else if options.multi_line_strings {
        shortcut.push(
            rule(
                TokenClass::Str,
                r#"^(?:'(?:[^\\']|\\[\s\S])*(?:'|$)|"(?:[^\\"]|\\[\s\S])*(?:"|$)|`(?:[^\\`]|\\[\s\S])*(?:`|$))"#,
            )
            .dispatch("'\"`"),
        );
    } else {
        shortcut.push(
            rule(
                TokenClass::Str,
                r#"^(?:'(?:[^\\'\r\n]|\\.)*(?:'|$)|"(?:[^\\"\r\n]|\\.)*(?:"|$))"#,
            )
            .dispatch("\"'"),
        );
    }

    if options.verbatim_strings {
        fallthrough.push(rule(TokenClass::Str, r#"^@"(?:[^"]|"")*(?:"|$)"#));
    }

    if options.hash_comments {
        if options.c_style_comments {
            shortcut.push(
                rule(
                    TokenClass::Comment,
                    r"^#(?:(?:define|elif|else|endif|error|ifdef|include|ifndef|line|pragma|undef|warning)\b|[^\r\n]*)",
                )
                .dispatch("#"),
            );
            // #include <header.h>
            fallthrough.push(rule(
                TokenClass::Str,
                r"^<(?:(?:(?:\.\.\/)*|\/?)(?:[\w-]+(?:\/[\w-]+)+)?[\w-]+\.h|[a-z]\w*)>",
            ));
        } else {
            shortcut.push(rule(TokenClass::Comment, r"^#[^\r\n]*").dispatch("#"));
        }
    }

    if options.c_style_comments {
        fallthrough.push(rule(TokenClass::Comment, r"^\/\/[^\r\n]*"));
        fallthrough.push(rule(TokenClass::Comment, r"^\/\*[\s\S]*?(?:\*\/|$)"));
    }

    if options.regex_literals {
        fallthrough.push(Rule::new(
            TokenClass::embedded("regex"),
            Pattern::new(regex_literal_pattern()),
        ));
    }

    if let Some(keywords) = keyword_pattern(options.keywords) {
        fallthrough.push(Rule::new(TokenClass::Keyword, Pattern::new(keywords)));
    }

    shortcut.push(rule(TokenClass::Plain, r"^\s+").dispatch(" \r\n\t\u{a0}"));

    fallthrough.extend([
        nocase(TokenClass::Literal, r"^@[a-z_$][a-z_$@0-9]*"),
        rule(TokenClass::Type, r"^@?[A-Z]+[a-z][A-Za-z_$@0-9]*"),
        nocase(TokenClass::Plain, r"^[a-z_$][a-z_$@0-9]*"),
        nocase(
            TokenClass::Literal,
            r"^(?:0x[a-f0-9]+|(?:\d(?:_\d+)*\d*(?:\.\d*)?|\.\d+)(?:e[+\-]?\d+)?)[a-z]*",
        ),
        rule(TokenClass::Punctuation, r#"^.[^\s\w\.$@\'\"\`\/\#]*"#),
    ]);

    SimpleLexer::new(shortcut, fallthrough)
}

/// HTML and XML, handing scripts, styles and tag interiors over to other lexers.
fn markup() -> LustroResult<SimpleLexer> {
    SimpleLexer::new(
        vec![],
        vec![
            rule(TokenClass::Plain, r"^[^<?]+"),
            rule(TokenClass::Declaration, r"^<!\w[^>]*(?:>|$)"),
            rule(TokenClass::Comment, r"^<\!--[\s\S]*?(?:-\->|$)"),
            // Processing instructions and server side code, in whatever language they look like
            rule(TokenClass::embedded(""), r"^<\?([\s\S]+?)(?:\?>|$)"),
            rule(TokenClass::embedded(""), r"^<%([\s\S]+?)(?:%>|$)"),
            rule(TokenClass::Punctuation, r"^(?:<[%?]|[%?]>)"),
            nocase(TokenClass::embedded(""), r"^<xmp\b[^>]*>([\s\S]+?)<\/xmp\b[^>]*>"),
            nocase(
                TokenClass::embedded("js"),
                r"^<script\b[^>]*>([\s\S]*?)(<\/script\b[^>]*>)",
            ),
            nocase(
                TokenClass::embedded("css"),
                r"^<style\b[^>]*>([\s\S]*?)(<\/style\b[^>]*>)",
            ),
            nocase(TokenClass::embedded("in.tag"), r"^(<\/?[a-z][^<>]*>)"),
        ],
    )
}

/// The inside of a tag: name, attributes and their values.
fn tag_interior() -> LustroResult<SimpleLexer> {
    SimpleLexer::new(
        vec![
            rule(TokenClass::Plain, r"^[\s]+").dispatch(" \t\r\n"),
            rule(TokenClass::AttrValue, r#"^(?:\"[^\"]*\"?|\'[^\']*\'?)"#).dispatch("\"'"),
        ],
        vec![
            nocase(TokenClass::Tag, r"^^<\/?[a-z](?:[\w.:-]*\w)?|\/?>$"),
            nocase(TokenClass::AttrName, r"^(?!style[\s=]|on)[a-z](?:[\w:-]*\w)?"),
            rule(
                TokenClass::embedded("uq.val"),
                r#"^=\s*([^>\'\"\s]*(?:[^>\'\"\s\/]|\/(?=\s)))"#,
            ),
            rule(TokenClass::Punctuation, r"^[=<>\/]+"),
            nocase(TokenClass::embedded("js"), r#"^on\w+\s*=\s*\"([^\"]+)\""#),
            nocase(TokenClass::embedded("js"), r#"^on\w+\s*=\s*\'([^\']+)\'"#),
            nocase(TokenClass::embedded("js"), r#"^on\w+\s*=\s*([^\"\'>\s]+)"#),
            nocase(TokenClass::embedded("css"), r#"^style\s*=\s*\"([^\"]+)\""#),
            nocase(TokenClass::embedded("css"), r#"^style\s*=\s*\'([^\']+)\'"#),
            nocase(TokenClass::embedded("css"), r#"^style\s*=\s*([^\"\'>\s]+)"#),
        ],
    )
}

/// A single rule lexer marking everything with `class`.
fn whole(class: TokenClass, source: &'static str) -> LustroResult<SimpleLexer> {
    SimpleLexer::new(vec![], vec![rule(class, source)])
}

fn css() -> LustroResult<SimpleLexer> {
    SimpleLexer::new(
        vec![rule(TokenClass::Plain, r"^[ \t\r\n\f]+").dispatch(" \t\r\n\u{c}")],
        vec![
            rule(TokenClass::Str, r#"^\"(?:[^\n\r\f\\\"]|\\(?:\r\n?|\n|\f)|\\[\s\S])*\""#),
            rule(TokenClass::Str, r#"^\'(?:[^\n\r\f\\\']|\\(?:\r\n?|\n|\f)|\\[\s\S])*\'"#),
            nocase(TokenClass::embedded("css-str"), r#"^url\(([^\)\"\']*)\)"#),
            nocase(
                TokenClass::Keyword,
                r"^(?:url|rgb|\!important|@import|@page|@media|@charset|inherit)(?=[^\-\w]|$)",
            ),
            nocase(
                TokenClass::embedded("css-kw"),
                r"^(-?(?:[_a-z]|(?:\\[0-9a-f]+ ?))(?:[_a-z0-9\-]|\\(?:\\[0-9a-f]+ ?))*)\s*:",
            ),
            rule(TokenClass::Comment, r"^\/\*[^*]*\*+(?:[^\/*][^*]*\*+)*\/"),
            rule(TokenClass::Comment, r"^(?:<!--|--\>)"),
            nocase(TokenClass::Literal, r"^(?:\d+|\d*\.\d+)(?:%|[a-z]+)?"),
            nocase(TokenClass::Literal, r"^#(?:[0-9a-f]{3}){1,2}"),
            nocase(
                TokenClass::Plain,
                r"^-?(?:[_a-z]|(?:\\[\da-f]+ ?))(?:[_a-z\d\-]|\\(?:\\[\da-f]+ ?))*",
            ),
            rule(TokenClass::Punctuation, r#"^[^\s\w\'\"]+"#),
        ],
    )
}

fn haskell() -> LustroResult<SimpleLexer> {
    SimpleLexer::new(
        vec![
            rule(TokenClass::Plain, r"^[\t\n\x0B\x0C\r ]+").dispatch("\t\n\u{b}\u{c}\r "),
            rule(TokenClass::Str, r#"^\"(?:[^\"\\\n\x0C\r]|\\[\s\S])*(?:\"|$)"#).dispatch("\""),
            rule(TokenClass::Str, r#"^\'(?:[^\'\\\n\x0C\r]|\\[^&])\'?"#).dispatch("'"),
            nocase(
                TokenClass::Literal,
                r"^(?:0o[0-7]+|0x[\da-f]+|\d+(?:\.\d+)?(?:e[+\-]?\d+)?)",
            )
            .dispatch("0123456789"),
        ],
        vec![
            rule(
                TokenClass::Comment,
                r"^(?:(?:--+(?:[^\r\n\x0C]*)?)|(?:\{-(?:[^-]|-+[^-\}])*-\}))",
            ),
            rule(
                TokenClass::Keyword,
                r"^(?:case|class|data|default|deriving|do|else|if|import|in|infix|infixl|infixr|instance|let|module|newtype|of|then|type|where|_)(?=[^a-zA-Z0-9\']|$)",
            ),
            rule(TokenClass::Plain, r"^(?:[A-Z][\w\']*\.)*[a-zA-Z][\w\']*"),
            rule(TokenClass::Punctuation, r#"^[^\t\n\x0B\x0C\r a-zA-Z0-9\'\"]+"#),
        ],
    )
}

fn lisp() -> LustroResult<SimpleLexer> {
    SimpleLexer::new(
        vec![
            rule(TokenClass::Custom("opn".into()), r"^\(+").dispatch("("),
            rule(TokenClass::Custom("clo".into()), r"^\)+").dispatch(")"),
            rule(TokenClass::Comment, r"^;[^\r\n]*").dispatch(";"),
            rule(TokenClass::Plain, r"^[\t\n\r \xA0]+").dispatch("\t\n\r \u{a0}"),
            rule(TokenClass::Str, r#"^\"(?:[^\"\\]|\\[\s\S])*(?:\"|$)"#).dispatch("\""),
        ],
        vec![
            rule(
                TokenClass::Keyword,
                r"^(?:block|c[ad]+r|catch|con[ds]|def(?:ine|un)|do|eq|eql|equal|equalp|eval-when|flet|format|go|if|labels|lambda|let|load-time-value|locally|macrolet|multiple-value-call|nil|progn|progv|quote|require|return-from|setq|symbol-macrolet|t|tagbody|the|throw|unwind)\b",
            ),
            nocase(
                TokenClass::Literal,
                r"^[+\-]?(?:0x[0-9a-f]+|\d+\/\d+|(?:\.\d+|\d+(?:\.\d*)?)(?:[ed][+\-]?\d+)?)",
            ),
            rule(
                TokenClass::Literal,
                r"^\'(?:-*(?:\w|\\[\x21-\x7e])(?:[\w-]*|\\[\x21-\x7e])[=!?]?)?",
            ),
            nocase(
                TokenClass::Plain,
                r"^-*(?:[a-z_]|\\[\x21-\x7e])(?:[\w-]*|\\[\x21-\x7e])[=!?]?",
            ),
            rule(TokenClass::Punctuation, r#"^[^\w\t\n\r \xA0()\"\\\';]+"#),
        ],
    )
}

fn lua() -> LustroResult<SimpleLexer> {
    SimpleLexer::new(
        vec![
            rule(TokenClass::Plain, r"^[\t\n\r \xA0]+").dispatch("\t\n\r \u{a0}"),
            rule(
                TokenClass::Str,
                r#"^(?:\"(?:[^\"\\]|\\[\s\S])*(?:\"|$)|\'(?:[^\'\\]|\\[\s\S])*(?:\'|$))"#,
            )
            .dispatch("\"'"),
        ],
        vec![
            rule(TokenClass::Comment, r"^--(?:\[(=*)\[[\s\S]*?(?:\]\1\]|$)|[^\r\n]*)"),
            rule(TokenClass::Str, r"^\[(=*)\[[\s\S]*?(?:\]\1\]|$)"),
            rule(
                TokenClass::Keyword,
                r"^(?:and|break|do|else|elseif|end|false|for|function|if|in|local|nil|not|or|repeat|return|then|true|until|while)\b",
            ),
            nocase(
                TokenClass::Literal,
                r"^[+-]?(?:0x[\da-f]+|(?:(?:\.\d+|\d+(?:\.\d*)?)(?:e[+\-]?\d+)?))",
            ),
            nocase(TokenClass::Plain, r"^[a-z_]\w*"),
            rule(
                TokenClass::Punctuation,
                r#"^[^\w\t\n\r \xA0][^\w\t\n\r \xA0\"\'\-\+=]*"#,
            ),
        ],
    )
}

fn sql() -> LustroResult<SimpleLexer> {
    SimpleLexer::new(
        vec![
            rule(TokenClass::Plain, r"^[\t\n\r \xA0]+").dispatch("\t\n\r \u{a0}"),
            rule(
                TokenClass::Str,
                r#"^(?:"(?:[^\"\\]|\\.)*"|'(?:[^\'\\]|\\.)*')"#,
            )
            .dispatch("\"'"),
        ],
        vec![
            rule(TokenClass::Comment, r"^(?:--[^\r\n]*|\/\*[\s\S]*?(?:\*\/|$))"),
            Rule::new(
                TokenClass::Keyword,
                Pattern::nocase(format!(r"^(?:{SQL_KEYWORDS})(?=[^\w-]|$)")),
            ),
            nocase(
                TokenClass::Literal,
                r"^[+-]?(?:0x[\da-f]+|(?:(?:\.\d+|\d+(?:\.\d*)?)(?:e[+\-]?\d+)?))",
            ),
            nocase(TokenClass::Plain, r"^[a-z_][\w-]*"),
            rule(
                TokenClass::Punctuation,
                r#"^[^\w\t\n\r \xA0\"\'][^\w\t\n\r \xA0+\-\"\']*"#,
            ),
        ],
    )
}

fn yaml() -> LustroResult<SimpleLexer> {
    SimpleLexer::new(
        vec![
            rule(TokenClass::Punctuation, r"^[:|>?]+").dispatch(":|>?"),
            rule(TokenClass::Declaration, r"^%(?:YAML|TAG)[^#\r\n]+").dispatch("%"),
            rule(TokenClass::Type, r"^[&]\S+").dispatch("&"),
            rule(TokenClass::Type, r"^!\S*").dispatch("!"),
            rule(TokenClass::Str, r#"^"(?:[^\\"]|\\.)*(?:"|$)"#).dispatch("\""),
            rule(TokenClass::Str, r"^'(?:[^']|'')*(?:'|$)").dispatch("'"),
            rule(TokenClass::Comment, r"^#[^\r\n]*").dispatch("#"),
            rule(TokenClass::Plain, r"^\s+").dispatch(" \t\r\n"),
        ],
        vec![
            rule(TokenClass::Declaration, r"^(?:---|\.\.\.)(?:[\r\n]|$)"),
            rule(TokenClass::Punctuation, r"^-"),
            rule(TokenClass::Keyword, r"^\w+:[ \r\n]"),
            rule(TokenClass::Plain, r"^\w+"),
        ],
    )
}

/// Registers every builtin language in the registry.
pub(crate) fn register_all(registry: &Registry) -> LustroResult<()> {
    let register = |lexer: SimpleLexer, ids: &[&str]| {
        registry.register(Arc::new(lexer), ids);
    };

    register(
        source_decorator(&SourceDecoratorOptions {
            keywords: ALL_KEYWORDS,
            hash_comments: true,
            c_style_comments: true,
            multi_line_strings: true,
            regex_literals: true,
            ..Default::default()
        })?,
        &[DEFAULT_CODE],
    );
    register(
        markup()?,
        &[DEFAULT_MARKUP, "htm", "html", "mxml", "xhtml", "xml", "xsl"],
    );
    register(tag_interior()?, &["in.tag"]);
    register(whole(TokenClass::AttrValue, r"^[\s\S]+")?, &["uq.val"]);
    register(
        source_decorator(&SourceDecoratorOptions {
            keywords: CPP_KEYWORDS,
            hash_comments: true,
            c_style_comments: true,
            ..Default::default()
        })?,
        &["c", "cc", "cpp", "cxx", "cyc", "m"],
    );
    register(
        source_decorator(&SourceDecoratorOptions {
            keywords: &["null true false"],
            ..Default::default()
        })?,
        &["json"],
    );
    register(
        source_decorator(&SourceDecoratorOptions {
            keywords: CS_KEYWORDS,
            hash_comments: true,
            c_style_comments: true,
            verbatim_strings: true,
            ..Default::default()
        })?,
        &["cs"],
    );
    register(
        source_decorator(&SourceDecoratorOptions {
            keywords: JAVA_KEYWORDS,
            c_style_comments: true,
            ..Default::default()
        })?,
        &["java"],
    );
    register(
        source_decorator(&SourceDecoratorOptions {
            keywords: SH_KEYWORDS,
            hash_comments: true,
            multi_line_strings: true,
            ..Default::default()
        })?,
        &["bsh", "csh", "sh"],
    );
    register(
        source_decorator(&SourceDecoratorOptions {
            keywords: PYTHON_KEYWORDS,
            hash_comments: true,
            multi_line_strings: true,
            triple_quoted_strings: true,
            ..Default::default()
        })?,
        &["cv", "py"],
    );
    register(
        source_decorator(&SourceDecoratorOptions {
            keywords: &[PERL_KEYWORDS],
            hash_comments: true,
            multi_line_strings: true,
            regex_literals: true,
            ..Default::default()
        })?,
        &["perl", "pl", "pm"],
    );
    register(
        source_decorator(&SourceDecoratorOptions {
            keywords: RUBY_KEYWORDS,
            hash_comments: true,
            multi_line_strings: true,
            regex_literals: true,
            ..Default::default()
        })?,
        &["rb"],
    );
    register(
        source_decorator(&SourceDecoratorOptions {
            keywords: JS_KEYWORDS,
            c_style_comments: true,
            regex_literals: true,
            ..Default::default()
        })?,
        &["js"],
    );
    register(whole(TokenClass::Str, r"^[\s\S]+")?, &["regex"]);
    register(
        source_decorator(&SourceDecoratorOptions {
            keywords: &[PROTO_KEYWORDS],
            c_style_comments: true,
            ..Default::default()
        })?,
        &["proto"],
    );
    register(css()?, &["css"]);
    register(
        SimpleLexer::new(
            vec![],
            vec![nocase(
                TokenClass::Keyword,
                r"^-?(?:[_a-z]|(?:\\[\da-f]+ ?))(?:[_a-z\d\-]|\\(?:\\[\da-f]+ ?))*",
            )],
        )?,
        &["css-kw"],
    );
    register(whole(TokenClass::Str, r#"^[^\)\"\']+"#)?, &["css-str"]);
    register(haskell()?, &["hs"]);
    register(lisp()?, &["cl", "el", "lisp", "scm"]);
    register(lua()?, &["lua"]);
    register(sql()?, &["sql"]);
    register(yaml()?, &["yaml", "yml"]);

    Ok(())
}
