#[macro_use]
mod common;

#[cfg(test)]
mod this {
    tests! {
        closure:
        "class Foo { getClosure() { fun closure() { return this.name; } return closure; } init(name) { this.name = name; } } \
         var closure = Foo(\"Foo\").getClosure(); print closure();"
        => OK "Foo"
    }

    tests! {
        nested_class:
        "class Outer { method() { fun f() { class Inner { method() { print this; } } Inner().method(); } f(); print this; } } Outer().method();"
        => OK "Inner instance", "Outer instance"
    }

    tests! {
        this_at_top_level:
        "print this;"
        => ERR "[line 1:7] Error at 'this': Can't use 'this' outside of a class."
    }

    tests! {
        this_in_method:
        "class Foo { init(value) { this.value = value; } getValue() { return this.value; } } print Foo(\"baz\").getValue();"
        => OK "baz"
    }

    tests! {
        this_in_top_level_function:
        "fun f() { print this; }"
        => ERR "[line 1:17] Error at 'this': Can't use 'this' outside of a class."
    }
}
