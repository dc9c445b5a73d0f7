//! Integration-test-file renderer: compile-time assertions proving each
//! generated validator's inferred shape matches the original declaration.

use crate::generate::TypeAssertion;

const HEADER: &str = "// Generated by zodgen";

/// Render the type-equivalence assertion file.
///
/// `spec_import` points at the module with the original declarations,
/// `schema_import` at the generated validator file. Assertions cover only
/// declarations that are exported from the source module; anything else is
/// not addressable from the test file.
pub fn render_integration_file(
    assertions: &[TypeAssertion],
    spec_import: &str,
    schema_import: &str,
) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str("import { z } from \"zod\";\n");
    out.push('\n');
    out.push_str(&format!("import * as spec from \"{}\";\n", spec_import));
    out.push_str(&format!(
        "import * as generated from \"{}\";\n",
        schema_import
    ));
    out.push('\n');
    out.push_str("// eslint-disable-next-line @typescript-eslint/no-unused-vars\n");
    out.push_str("function expectType<T>(_: T) {\n  /* noop */\n}\n");

    for assertion in assertions {
        out.push('\n');
        out.push_str(&format!(
            "export type {name}InferredType = z.infer<typeof generated.{name}>;\n",
            name = assertion.schema_name
        ));
    }
    for assertion in assertions {
        out.push_str(&format!(
            "expectType<spec.{ty}>({{}} as {name}InferredType)\n",
            ty = assertion.type_name,
            name = assertion.schema_name
        ));
        out.push_str(&format!(
            "expectType<{name}InferredType>({{}} as spec.{ty})\n",
            ty = assertion.type_name,
            name = assertion.schema_name
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assertion(ty: &str, name: &str) -> TypeAssertion {
        TypeAssertion {
            type_name: ty.to_string(),
            schema_name: name.to_string(),
        }
    }

    #[test]
    fn renders_inferred_types_then_assertion_pairs() {
        let assertions = vec![
            assertion("Name", "nameSchema"),
            assertion("Superman", "supermanSchema"),
        ];
        let file = render_integration_file(&assertions, "./hero", "hero.zod");
        let expected = r#"// Generated by zodgen
import { z } from "zod";

import * as spec from "./hero";
import * as generated from "hero.zod";

// eslint-disable-next-line @typescript-eslint/no-unused-vars
function expectType<T>(_: T) {
  /* noop */
}

export type nameSchemaInferredType = z.infer<typeof generated.nameSchema>;

export type supermanSchemaInferredType = z.infer<typeof generated.supermanSchema>;
expectType<spec.Name>({} as nameSchemaInferredType)
expectType<nameSchemaInferredType>({} as spec.Name)
expectType<spec.Superman>({} as supermanSchemaInferredType)
expectType<supermanSchemaInferredType>({} as spec.Superman)
"#;
        assert_eq!(file, expected);
    }

    #[test]
    fn empty_assertion_list_still_renders_scaffold() {
        let file = render_integration_file(&[], "./hero", "hero.zod");
        assert!(file.starts_with("// Generated by zodgen\n"));
        assert!(file.contains("function expectType<T>(_: T)"));
        assert!(!file.contains("InferredType"));
    }
}
