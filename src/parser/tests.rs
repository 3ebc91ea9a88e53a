//! Parser tests.

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::error::ParserError;
    use crate::lexer::Scanner;
    use crate::parser::{allows_jsx, parse_file_source, Parser};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn parse(source: &str) -> Program {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(tokens).parse().unwrap()
    }

    fn kinds(source: &str) -> Vec<StmtKind> {
        parse(source)
            .statements
            .into_iter()
            .map(|stmt| stmt.kind)
            .collect()
    }

    fn single(source: &str) -> StmtKind {
        let mut kinds = kinds(source);
        assert_eq!(kinds.len(), 1, "expected one statement in {:?}", source);
        kinds.remove(0)
    }

    fn exported(decl: Declaration) -> StmtKind {
        StmtKind::Declaration {
            decl,
            export: ExportModifier::Export,
        }
    }

    fn ident(name: &str) -> BindingPattern {
        BindingPattern::Identifier(name.to_string())
    }

    fn element(property: Option<&str>, target: BindingPattern) -> BindingElement {
        BindingElement {
            property: property.map(str::to_string),
            target,
            rest: false,
        }
    }

    fn specifier_names(kind: &StmtKind) -> Vec<(String, String)> {
        match kind {
            StmtKind::ExportNamed(named) => named
                .specifiers
                .iter()
                .map(|s| (s.local.clone(), s.exported_name().to_string()))
                .collect(),
            other => panic!("Expected export clause, got {:?}", other),
        }
    }

    #[test]
    fn test_exported_declarations() {
        assert_eq!(
            single("export class Foo {}"),
            exported(Declaration::Class {
                name: Some("Foo".to_string())
            })
        );
        assert_eq!(
            single("export interface Props { a: string }"),
            exported(Declaration::Interface {
                name: "Props".to_string()
            })
        );
        assert_eq!(
            single("export enum Color { Red, Green }"),
            exported(Declaration::Enum {
                name: "Color".to_string()
            })
        );
        assert_eq!(
            single("export function helper(a, b) { return a + b; }"),
            exported(Declaration::Function {
                name: Some("helper".to_string())
            })
        );
        assert_eq!(
            single("export type Id<T> = { id: T } | string;"),
            exported(Declaration::TypeAlias {
                name: "Id".to_string()
            })
        );
    }

    #[test]
    fn test_variable_declarators() {
        let kind = single("export const a = 1, { b, c: d } = obj;");
        assert_eq!(
            kind,
            exported(Declaration::Variable {
                kind: VariableKind::Const,
                declarators: vec![
                    ident("a"),
                    BindingPattern::Object(vec![
                        element(Some("b"), ident("b")),
                        element(Some("c"), ident("d")),
                    ]),
                ],
            })
        );
    }

    #[test]
    fn test_generic_initializer_does_not_split_declarators() {
        let kind = single("export let cache = new Map<string, number>(), size = 0;");
        assert_eq!(
            kind,
            exported(Declaration::Variable {
                kind: VariableKind::Let,
                declarators: vec![ident("cache"), ident("size")],
            })
        );
    }

    #[test]
    fn test_comparison_initializer_keeps_next_declarator() {
        assert_eq!(
            single("export const x = a < b, y = 1;"),
            exported(Declaration::Variable {
                kind: VariableKind::Const,
                declarators: vec![ident("x"), ident("y")],
            })
        );
        assert_eq!(
            single("export const t = a < b ? c : d, u = 2;"),
            exported(Declaration::Variable {
                kind: VariableKind::Const,
                declarators: vec![ident("t"), ident("u")],
            })
        );
    }

    #[test]
    fn test_type_arguments_with_object_types_do_not_split_declarators() {
        assert_eq!(
            single("export const m = new Map<string, { a: number; f: () => void }>(), n = 2;"),
            exported(Declaration::Variable {
                kind: VariableKind::Const,
                declarators: vec![ident("m"), ident("n")],
            })
        );
        assert_eq!(
            single("export let r: Record<string, number> = {}, s = 1;"),
            exported(Declaration::Variable {
                kind: VariableKind::Let,
                declarators: vec![ident("r"), ident("s")],
            })
        );
    }

    #[test]
    fn test_jsx_bodies_in_tsx_files() {
        let source = "export const Button = () => <div className=\"btn\">hi</div>;\n\
                      export function List({ items }) {\n\
                      \x20 return <ul>{items.map(i => <li key={i}>{i}</li>)}</ul>;\n\
                      }\n\
                      export const other = 1;\n\
                      export default <App />;";
        let program = parse_file_source(source, Path::new("/p/button.tsx")).unwrap();
        let kinds: Vec<StmtKind> = program.statements.into_iter().map(|s| s.kind).collect();

        assert_eq!(
            kinds,
            vec![
                exported(Declaration::Variable {
                    kind: VariableKind::Const,
                    declarators: vec![ident("Button")],
                }),
                exported(Declaration::Function {
                    name: Some("List".to_string())
                }),
                exported(Declaration::Variable {
                    kind: VariableKind::Const,
                    declarators: vec![ident("other")],
                }),
                StmtKind::ExportDefaultExpression,
            ]
        );
    }

    #[test]
    fn test_jsx_only_enabled_by_extension() {
        assert!(allows_jsx(Path::new("/p/a.tsx")));
        assert!(allows_jsx(Path::new("/p/a.jsx")));
        assert!(allows_jsx(Path::new("/p/a.js")));
        assert!(!allows_jsx(Path::new("/p/a.ts")));
        assert!(!allows_jsx(Path::new("/p/a.d.ts")));

        // A `.ts` file keeps `<T>` type assertions
        let program = parse_file_source("export const n = <number>value;", Path::new("/p/a.ts"));
        assert_eq!(program.unwrap().statements.len(), 1);
        let jsx_in_ts = parse_file_source("export const B = <div>hi</div>;", Path::new("/p/a.ts"));
        assert!(jsx_in_ts.is_err());
    }

    #[test]
    fn test_array_destructuring_with_holes_defaults_and_rest() {
        let kind = single("export const [first, , third = 3, ...others] = list;");
        assert_eq!(
            kind,
            exported(Declaration::Variable {
                kind: VariableKind::Const,
                declarators: vec![BindingPattern::Array(vec![
                    element(None, ident("first")),
                    element(None, ident("third")),
                    BindingElement {
                        property: None,
                        target: ident("others"),
                        rest: true,
                    },
                ])],
            })
        );
    }

    #[test]
    fn test_nested_object_destructuring() {
        let kind = single("export const { a: { b }, c = 2, ...rest } = obj;");
        assert_eq!(
            kind,
            exported(Declaration::Variable {
                kind: VariableKind::Const,
                declarators: vec![BindingPattern::Object(vec![
                    element(
                        Some("a"),
                        BindingPattern::Object(vec![element(Some("b"), ident("b"))])
                    ),
                    element(Some("c"), ident("c")),
                    BindingElement {
                        property: None,
                        target: ident("rest"),
                        rest: true,
                    },
                ])],
            })
        );
    }

    #[test]
    fn test_export_clause_local_and_renamed() {
        let kind = single("export { a, b as c };");
        assert_eq!(
            specifier_names(&kind),
            vec![
                ("a".to_string(), "a".to_string()),
                ("b".to_string(), "c".to_string()),
            ]
        );
        match kind {
            StmtKind::ExportNamed(named) => assert!(named.source.is_none()),
            other => panic!("Expected export clause, got {:?}", other),
        }
    }

    #[test]
    fn test_export_clause_with_source_keeps_raw_quotes() {
        let kind = single("export { x } from './m';");
        match kind {
            StmtKind::ExportNamed(named) => {
                let source = named.source.unwrap();
                assert_eq!(source.raw, "'./m'");
                assert!(!named.type_only);
            }
            other => panic!("Expected export clause, got {:?}", other),
        }
    }

    #[test]
    fn test_export_clause_special_names_and_attributes() {
        let kind = single(concat!(
            r#"export { default as Foo, type Bar, "string name" as baz } "#,
            r#"from "./x" with { type: "json" };"#,
        ));
        assert_eq!(
            specifier_names(&kind),
            vec![
                ("default".to_string(), "Foo".to_string()),
                ("Bar".to_string(), "Bar".to_string()),
                ("string name".to_string(), "baz".to_string()),
            ]
        );
        match kind {
            StmtKind::ExportNamed(named) => {
                assert!(named.specifiers[1].type_only);
                assert!(!named.specifiers[0].type_only);
            }
            other => panic!("Expected export clause, got {:?}", other),
        }
    }

    #[test]
    fn test_type_only_export_clause() {
        match single("export type { T } from './types';") {
            StmtKind::ExportNamed(named) => assert!(named.type_only),
            other => panic!("Expected export clause, got {:?}", other),
        }
    }

    #[test]
    fn test_star_exports() {
        match single("export * from './all';") {
            StmtKind::ExportAll(all) => {
                assert_eq!(all.source.raw, "'./all'");
                assert_eq!(all.alias, None);
            }
            other => panic!("Expected star export, got {:?}", other),
        }
        match single("export * as ns from \"./ns\";") {
            StmtKind::ExportAll(all) => {
                assert_eq!(all.source.raw, "\"./ns\"");
                assert_eq!(all.alias, Some("ns".to_string()));
            }
            other => panic!("Expected star export, got {:?}", other),
        }
    }

    #[test]
    fn test_export_default_forms() {
        assert_eq!(
            single("export default class {}"),
            StmtKind::Declaration {
                decl: Declaration::Class { name: None },
                export: ExportModifier::ExportDefault,
            }
        );
        assert_eq!(
            single("export default async function load() {}"),
            StmtKind::Declaration {
                decl: Declaration::Function {
                    name: Some("load".to_string())
                },
                export: ExportModifier::ExportDefault,
            }
        );
        assert_eq!(
            single("export default { a: 1 };"),
            StmtKind::ExportDefaultExpression
        );
        assert_eq!(single("export = api;"), StmtKind::ExportAssignment);
    }

    #[test]
    fn test_ambient_and_modified_declarations() {
        assert_eq!(
            single("export declare const VERSION: string;"),
            exported(Declaration::Variable {
                kind: VariableKind::Const,
                declarators: vec![ident("VERSION")],
            })
        );
        assert_eq!(
            single("export const enum Flags { A = 1 }"),
            exported(Declaration::Enum {
                name: "Flags".to_string()
            })
        );
        assert_eq!(
            single("export abstract class Shape { abstract area(): number; }"),
            exported(Declaration::Class {
                name: Some("Shape".to_string())
            })
        );
        assert_eq!(
            single("export namespace A.B.C { export const x = 1; }"),
            exported(Declaration::Namespace {
                name: "A".to_string()
            })
        );
        assert_eq!(
            single("export declare module \"foo\" { const y: number; }"),
            StmtKind::Other
        );
    }

    #[test]
    fn test_statements_separated_by_newlines() {
        let kinds = kinds("const x = 1\nexport function f() {}\nlet y = x\nexport { y }");
        assert_eq!(kinds.len(), 4);
        assert_eq!(
            kinds[0],
            StmtKind::Declaration {
                decl: Declaration::Variable {
                    kind: VariableKind::Const,
                    declarators: vec![ident("x")],
                },
                export: ExportModifier::None,
            }
        );
        assert_eq!(
            kinds[1],
            exported(Declaration::Function {
                name: Some("f".to_string())
            })
        );
        assert_eq!(specifier_names(&kinds[3]), vec![("y".to_string(), "y".to_string())]);
    }

    #[test]
    fn test_overload_signatures() {
        let kinds = kinds(
            "export function f(a: string): void;\n\
             export function f(a: number): void;\n\
             export function f(a: any) {}",
        );
        assert_eq!(kinds.len(), 3);
        for kind in kinds {
            assert_eq!(
                kind,
                exported(Declaration::Function {
                    name: Some("f".to_string())
                })
            );
        }
    }

    #[test]
    fn test_return_type_literal_and_generic_constraints() {
        let kinds = kinds(
            "export function make(): { a: number } { return { a: 1 }; }\n\
             export interface Props<T extends { id: string }> extends Base<T> { x: T }\n\
             export const after = 1;",
        );
        assert_eq!(kinds.len(), 3);
        assert_eq!(
            kinds[1],
            exported(Declaration::Interface {
                name: "Props".to_string()
            })
        );
        assert_eq!(
            kinds[2],
            exported(Declaration::Variable {
                kind: VariableKind::Const,
                declarators: vec![ident("after")],
            })
        );
    }

    #[test]
    fn test_decorated_class() {
        let kind = single(
            "@Component({ selector: 'app' })\n@Injectable()\nexport class AppComponent {}",
        );
        assert_eq!(
            kind,
            exported(Declaration::Class {
                name: Some("AppComponent".to_string())
            })
        );
    }

    #[test]
    fn test_braces_inside_literals_are_skipped() {
        let kinds = kinds(
            "const re = /\\{[a-z]+\\}/g;\n\
             const t = `{${value}}`;\n\
             const s = '}';\n\
             export const done = true;",
        );
        assert_eq!(kinds.len(), 4);
        assert_eq!(
            kinds[3],
            exported(Declaration::Variable {
                kind: VariableKind::Const,
                declarators: vec![ident("done")],
            })
        );
    }

    #[test]
    fn test_imports_and_expressions_are_other() {
        let kinds = kinds(
            "import { a } from './a';\n\
             import type { B } from './b';\n\
             console.log(a);\n\
             if (a) { run(); }",
        );
        assert!(kinds.iter().all(|kind| *kind == StmtKind::Other));
        assert_eq!(kinds.len(), 4);
    }

    #[test]
    fn test_barrel_entry_module() {
        let source = r#"export * from './jsx'
// @ts-ignore
export { fromInnerBarrel } from "@barrel-alias";
export { iAmReExported } from './barrel/partial-export';
export * from './barrel2';

export interface AuthState {
  authToken: string;
  isLoading: boolean;
}

export const initialState: AuthState = {
  authToken: 'foo',
  isLoading: false,
};

export enum ActionTypes {
  GET_TOKEN = '[auth] get token',
}

export class GetToken {
  readonly type = ActionTypes.GET_TOKEN;
}

export const tokenEpic = (httpClient: any) => (): any => {};

export function tokenReducer(
  state: AuthState = initialState,
) {
  return false;
}

const baz = 9;
const foobar = 1;

export { baz, foobar };

const myObj = {
  a: 1,
  b: 2,
};

export const { a, b: bAlias } = myObj;
"#;
        let kinds = kinds(source);
        assert_eq!(kinds.len(), 15);
        assert!(matches!(kinds[0], StmtKind::ExportAll(_)));
        assert!(matches!(kinds[1], StmtKind::ExportNamed(_)));
        assert_eq!(
            kinds[8],
            exported(Declaration::Variable {
                kind: VariableKind::Const,
                declarators: vec![ident("tokenEpic")],
            })
        );
        assert_eq!(
            kinds[9],
            exported(Declaration::Function {
                name: Some("tokenReducer".to_string())
            })
        );
        assert_eq!(
            specifier_names(&kinds[12]),
            vec![
                ("baz".to_string(), "baz".to_string()),
                ("foobar".to_string(), "foobar".to_string()),
            ]
        );
        assert_eq!(
            kinds[14],
            exported(Declaration::Variable {
                kind: VariableKind::Const,
                declarators: vec![BindingPattern::Object(vec![
                    element(Some("a"), ident("a")),
                    element(Some("b"), ident("bAlias")),
                ])],
            })
        );
    }

    #[test]
    fn test_unterminated_export_clause() {
        let tokens = Scanner::new("export { a").scan_tokens().unwrap();
        let err = Parser::new(tokens).parse().unwrap_err();
        assert!(matches!(err, ParserError::UnexpectedEof(_)));
    }

    #[test]
    fn test_missing_module_specifier() {
        let tokens = Scanner::new("export * from;").scan_tokens().unwrap();
        let err = Parser::new(tokens).parse().unwrap_err();
        assert!(matches!(err, ParserError::UnexpectedToken { .. }));
    }
}
