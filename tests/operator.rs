#[macro_use]
mod common;

#[cfg(test)]
mod operator {
    tests! {
        add:
        "print 1 + 2; print \"str\" + \"ing\";"
        => OK "3", "string"
    }

    tests! {
        add_mismatch:
        "print 1 + \"2\";"
        => ERR "[line 1:9] Runtime error: Operands must be two numbers or two strings."
    }

    tests! {
        subtract:
        "print 4 - 3; print 1.2 - 1.2;"
        => OK "1", "0"
    }

    tests! {
        multiply:
        "print 5 * 3; print 0.5 * 2;"
        => OK "15", "1"
    }

    tests! {
        divide:
        "print 8 / 2; print 0 / 5;"
        => OK "4", "0"
    }

    tests! {
        divide_by_zero:
        "print 1 / 0;"
        => ERR "[line 1:9] Runtime error: Division by zero."
    }

    tests! {
        comparison:
        "print 1 < 2; print 2 < 1; print 1 <= 1; print 2 > 1; print 1 >= 2;"
        => OK "true", "false", "true", "true", "false"
    }

    tests! {
        equals:
        "print 1 == 1; print 1 == 2; print \"a\" == \"a\"; print nil == nil; print 1 == \"1\";"
        => OK "true", "false", "true", "true", "false"
    }

    tests! {
        equals_class:
        "class Foo {} class Bar {} var a = Foo(); var b = Foo(); \
         print a == a; print a == b; print Foo() == Foo(); print Foo == Foo;"
        => OK "true", "false", "false", "true"
    }

    tests! {
        not_equals:
        "print 1 != 2; print 1 != 1;"
        => OK "true", "false"
    }

    tests! {
        negate:
        "print -3; print -(-3); var a = 3; print -a;"
        => OK "-3", "3", "-3"
    }

    tests! {
        negate_string:
        "print -\"foo\";"
        => ERR "[line 1:7] Runtime error: Operand must be a number."
    }

    tests! {
        negate_non_number_type:
        "class Foo {} print -Foo;"
        => ERR "[line 1:20] Runtime error: Operand must be a number."
    }

    tests! {
        not:
        "print !true; print !false; print !nil; print !123;"
        => OK "false", "true", "true", "false"
    }

    tests! {
        not_class:
        "class Foo {} print !Foo;"
        => OK "false"
    }

    tests! {
        less_literal_type_mismatch:
        "print 1 < \"1\";"
        => ERR "[line 1:9] Runtime error: Operand must be a number."
    }

    tests! {
        call_non_callable:
        "var x = 1; x();"
        => ERR "[line 1:14] Runtime error: Can only call functions and classes."
    }
}
