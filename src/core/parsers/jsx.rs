use anyhow::{Result, anyhow};
use std::sync::Arc;
use swc_common::{FileName, Globals, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

pub struct ParsedJSX {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
}

/// Parse JSX/TSX source code string into an AST.
///
/// Accepts a shared SourceMap for thread-safe parallel parsing. Comments are
/// not collected: the analysis only ever walks live syntax.
pub fn parse_jsx_source(
    code: String,
    file_path: &str,
    source_map: Arc<SourceMap>,
) -> Result<ParsedJSX> {
    use swc_common::GLOBALS;

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e))?;

        Ok(ParsedJSX { module, source_map })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tsx_component() {
        let code = r#"
            const LABELS = translate({ bird: "i18n.bird" });
            export const Bird = (props: { big: boolean }) => <p>{LABELS.bird}</p>;
        "#;
        let parsed = parse_jsx_source(code.to_string(), "bird.tsx", Default::default()).unwrap();
        assert_eq!(parsed.module.body.len(), 2);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = parse_jsx_source("const = ;".to_string(), "broken.tsx", Default::default());
        let err = result.err().unwrap();
        assert!(err.to_string().contains("broken.tsx"));
    }
}
