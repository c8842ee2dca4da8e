//! Shared test utilities for integration tests
//!
//! Provides common fixture creation used across multiple test files.

use assert_fs::prelude::*;

/// Create a small C project plus a usage report covering it.
///
/// Layout: `src/main.c` with two tracked calls, `src/render.c` with one,
/// and `include/api.h` with the declaration (parsed, never rewritten).
pub fn make_project() -> assert_fs::TempDir {
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("src/main.c")
        .write_str(concat!(
            "#include \"api.h\"\n",
            "\n",
            "int main(void) {\n",
            "    debug_print(ctx, \"start\", 1);\n",
            "    do_work();\n",
            "    debug_print(ctx, \"done\", 2);\n",
            "    return 0;\n",
            "}\n",
        ))
        .expect("write main.c");

    tmp.child("src/render.c")
        .write_str(concat!(
            "void render(void) {\n",
            "    debug_print(ctx, \"frame\");\n",
            "}\n",
        ))
        .expect("write render.c");

    tmp.child("include/api.h")
        .write_str("void debug_print(void *ctx, const char *msg, ...);\n")
        .expect("write api.h");

    tmp.child("usages.txt")
        .write_str(concat!(
            "Usages of debug_print  (4 usages found)\n",
            "    Found usages  (4 usages found)\n",
            "        include  (1 usage found)\n",
            "            api.h  (1 usage found)\n",
            "                declaration  (1 usage found)\n",
            "                    1 void debug_print(void *ctx, const char *msg, ...);\n",
            "        src  (3 usages found)\n",
            "            main.c  (2 usages found)\n",
            "                main  (2 usages found)\n",
            "                    4 debug_print(ctx, \"start\", 1);\n",
            "                    6 debug_print(ctx, \"done\", 2);\n",
            "            render.c  (1 usage found)\n",
            "                render  (1 usage found)\n",
            "                    2 debug_print(ctx, \"frame\");\n",
        ))
        .expect("write report");

    tmp
}
