use unminify_tests::fixture;

fixture!(sequences, "sequences");
fixture!(iife_module, "iife-module");
fixture!(dead_code, "dead-code");
fixture!(constant_switch, "constant-switch");
fixture!(string_table, "string-table");
fixture!(bundle_prelude, "bundle-prelude");
